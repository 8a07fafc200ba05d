//! Settlement and payment history endpoints.

use api_types::payment::{PaymentView, PaymentsResponse, Settle};
use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use csv::Writer;
use engine::{Money, Payment, User, commands::SettleCmd};
use serde::Serialize;

use crate::{ServerError, server::ServerState};

fn view(payment: Payment) -> PaymentView {
    PaymentView {
        id: payment.id,
        paid_by: payment.paid_by,
        paid_to: payment.paid_to,
        amount_minor: payment.amount_minor,
        paid_at: payment.paid_at,
    }
}

pub async fn settle(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<Settle>,
) -> Result<(StatusCode, Json<PaymentView>), ServerError> {
    let mut cmd = SettleCmd::new(user.username, payload.counterpart, Utc::now());
    if let Some(amount_minor) = payload.amount_minor {
        cmd = cmd.amount_minor(amount_minor);
    }

    let payment = state.engine.settle(cmd).await?;
    tracing::info!(
        "{} settled with {} ({})",
        payment.paid_by,
        payment.paid_to,
        Money::new(payment.amount_minor)
    );
    Ok((StatusCode::CREATED, Json(view(payment))))
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<PaymentsResponse>, ServerError> {
    let payments = state
        .engine
        .list_payments(&user.username)
        .await?
        .into_iter()
        .map(view)
        .collect();

    Ok(Json(PaymentsResponse { payments }))
}

#[derive(Serialize)]
struct ExportRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Paid By")]
    paid_by: String,
    #[serde(rename = "Paid To")]
    paid_to: String,
}

fn payments_csv(payments: Vec<Payment>) -> Result<Vec<u8>, ServerError> {
    let mut writer = Writer::from_writer(vec![]);
    if payments.is_empty() {
        writer
            .write_record(["ID", "Amount", "Date", "Paid By", "Paid To"])
            .map_err(|err| ServerError::Internal(format!("failed to write export header: {err}")))?;
    }
    for payment in payments {
        writer
            .serialize(ExportRow {
                id: payment.id.to_string(),
                amount: Money::new(payment.amount_minor).to_string(),
                date: payment.paid_at.to_rfc3339(),
                paid_by: payment.paid_by,
                paid_to: payment.paid_to,
            })
            .map_err(|err| ServerError::Internal(format!("failed to serialize export row: {err}")))?;
    }

    writer
        .into_inner()
        .map_err(|err| ServerError::Internal(format!("failed to finalize export: {err}")))
}

/// Payment history as a CSV attachment.
pub async fn export_csv(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<impl IntoResponse, ServerError> {
    let payments = state.engine.list_payments(&user.username).await?;
    let data = payments_csv(payments)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"payments.csv\"",
            ),
        ],
        data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn empty_export_still_has_a_header() {
        let data = payments_csv(vec![]).unwrap();
        assert_eq!(
            String::from_utf8(data).unwrap(),
            "ID,Amount,Date,Paid By,Paid To\n"
        );
    }

    #[test]
    fn amounts_are_exported_in_major_units() {
        let payment = Payment {
            id: Uuid::nil(),
            paid_by: "alice".to_string(),
            paid_to: "bob".to_string(),
            amount_minor: 12_05,
            paid_at: Utc::now(),
        };
        let data = String::from_utf8(payments_csv(vec![payment]).unwrap()).unwrap();
        let mut lines = data.lines();
        assert_eq!(lines.next(), Some("ID,Amount,Date,Paid By,Paid To"));
        let row: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(row[0], Uuid::nil().to_string());
        assert_eq!(row[1], "12.05");
        assert_eq!(&row[3..], ["alice", "bob"]);
    }
}
