//! Ledger store: reads and writes over the `balances` table.
//!
//! Every function takes the connection or transaction to run on, so callers
//! decide the transactional scope. Writes never read-compute-write: balance
//! changes go through a single `INSERT .. ON CONFLICT DO UPDATE` that adds the
//! delta in the database, which keeps concurrent postings on the same pair
//! from losing updates.

use std::collections::HashMap;

use sea_orm::{
    ActiveValue, Condition, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{Balance, BalanceKey, ResultEngine, Split, balances};

/// Adds `delta` to the row at `key`, creating it with `delta` if absent.
pub(crate) async fn apply_delta<C: ConnectionTrait>(
    db: &C,
    key: &BalanceKey,
    delta: i64,
) -> ResultEngine<()> {
    let row = balances::ActiveModel {
        group_id: ActiveValue::Set(key.group_id.to_string()),
        lender: ActiveValue::Set(key.lender.clone()),
        borrower: ActiveValue::Set(key.borrower.clone()),
        amount_minor: ActiveValue::Set(delta),
    };

    balances::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                balances::Column::GroupId,
                balances::Column::Lender,
                balances::Column::Borrower,
            ])
            .value(
                balances::Column::AmountMinor,
                Expr::col((balances::Entity, balances::Column::AmountMinor)).add(delta),
            )
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Posts both directions of every share of `split`: the payer's forward row
/// grows by the share and the borrower's reverse row shrinks by it.
pub(crate) async fn apply_split<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    split: &Split,
) -> ResultEngine<()> {
    for share in &split.shares {
        let forward = BalanceKey::new(group_id, split.payer.as_str(), share.borrower.as_str());
        apply_delta(db, &forward, share.amount_minor).await?;
        apply_delta(db, &forward.reversed(), -share.amount_minor).await?;
    }
    Ok(())
}

/// Current amount at `key`; an absent row reads as zero.
pub(crate) async fn amount<C: ConnectionTrait>(db: &C, key: &BalanceKey) -> ResultEngine<i64> {
    let row = balances::Entity::find_by_id((
        key.group_id.to_string(),
        key.lender.clone(),
        key.borrower.clone(),
    ))
    .one(db)
    .await?;
    Ok(row.map(|r| r.amount_minor).unwrap_or(0))
}

pub(crate) async fn rows_for_borrower<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    borrower: &str,
) -> ResultEngine<Vec<Balance>> {
    balances::Entity::find()
        .filter(balances::Column::GroupId.eq(group_id.to_string()))
        .filter(balances::Column::Borrower.eq(borrower))
        .order_by_asc(balances::Column::Lender)
        .all(db)
        .await?
        .into_iter()
        .map(Balance::try_from)
        .collect()
}

/// Lender-side amounts of `lender`, summed per borrower. `group_id = None`
/// sums across every group.
pub(crate) async fn sum_by_borrower<C: ConnectionTrait>(
    db: &C,
    group_id: Option<Uuid>,
    lender: &str,
) -> ResultEngine<Vec<(String, i64)>> {
    let mut query = balances::Entity::find()
        .select_only()
        .column(balances::Column::Borrower)
        .column_as(Expr::col(balances::Column::AmountMinor).sum(), "total")
        .filter(balances::Column::Lender.eq(lender))
        .group_by(balances::Column::Borrower)
        .order_by_asc(balances::Column::Borrower);
    if let Some(group_id) = group_id {
        query = query.filter(balances::Column::GroupId.eq(group_id.to_string()));
    }

    let rows: Vec<(String, i64)> = query.into_tuple().all(db).await?;
    Ok(rows)
}

/// `(G, lender, member)` amount for every member in `members`, zero if absent.
pub(crate) async fn amounts_toward<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    lender: &str,
    members: &[String],
) -> ResultEngine<HashMap<String, i64>> {
    let rows = balances::Entity::find()
        .filter(balances::Column::GroupId.eq(group_id.to_string()))
        .filter(balances::Column::Lender.eq(lender))
        .filter(balances::Column::Borrower.is_in(members.iter().cloned()))
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| (row.borrower, row.amount_minor))
        .collect())
}

/// Sum of `amount_minor` over the rows matching `condition`; zero when none do.
async fn sum_where<C: ConnectionTrait>(db: &C, condition: Condition) -> ResultEngine<i64> {
    let total: Option<Option<i64>> = balances::Entity::find()
        .select_only()
        .column_as(Expr::col(balances::Column::AmountMinor).sum(), "total")
        .filter(condition)
        .into_tuple()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Sum of every lender-side amount of `lender` inside one group.
pub(crate) async fn lender_total<C: ConnectionTrait>(
    db: &C,
    group_id: Uuid,
    lender: &str,
) -> ResultEngine<i64> {
    sum_where(
        db,
        Condition::all()
            .add(balances::Column::GroupId.eq(group_id.to_string()))
            .add(balances::Column::Lender.eq(lender)),
    )
    .await
}

/// What `borrower` owes `lender` across every group.
pub(crate) async fn net_between<C: ConnectionTrait>(
    db: &C,
    lender: &str,
    borrower: &str,
) -> ResultEngine<i64> {
    sum_where(
        db,
        Condition::all()
            .add(balances::Column::Lender.eq(lender))
            .add(balances::Column::Borrower.eq(borrower)),
    )
    .await
}

/// Sets every row between `a` and `b`, both directions and every group, to
/// exactly zero. Rows are kept, not deleted.
pub(crate) async fn reset_pair<C: ConnectionTrait>(db: &C, a: &str, b: &str) -> ResultEngine<u64> {
    let result = balances::Entity::update_many()
        .col_expr(balances::Column::AmountMinor, Expr::value(0i64))
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(balances::Column::Lender.eq(a))
                        .add(balances::Column::Borrower.eq(b)),
                )
                .add(
                    Condition::all()
                        .add(balances::Column::Lender.eq(b))
                        .add(balances::Column::Borrower.eq(a)),
                ),
        )
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
