//! Receipt payloads handed to PDF generation and the notification service.
//!
//! Delivery itself (SMS, WhatsApp, email) is an external service; this module
//! only produces the data and message text it is fed with.

use serde::Serialize;

use crate::{
    aggregate::{meter_map::MeterMarker, round2},
    config::TariffConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptNotice {
    #[serde(rename = "cuenta")]
    pub account: String,
    #[serde(rename = "nombre")]
    pub customer_name: String,
    #[serde(rename = "distrito")]
    pub district: String,
    /// m3 billed.
    #[serde(rename = "consumo")]
    pub consumption: f64,
    #[serde(rename = "tarifa")]
    pub tariff: String,
    /// Amount due in Bs.
    #[serde(rename = "saldo")]
    pub amount_due: f64,
    #[serde(rename = "mensaje")]
    pub message: String,
}

/// JSON body of the external `/send-sms` and `/send-whatsapp` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRequest {
    pub phone: String,
    pub message: String,
}

impl ReceiptNotice {
    pub fn from_marker(marker: &MeterMarker, tariff: &TariffConfig) -> Self {
        let d = &marker.details;
        let consumption = round2(d.hourly_flow.iter().sum());
        let amount_due = round2(consumption * tariff.rate_per_m3);

        Self {
            account: d.account.clone(),
            customer_name: d.owner_name.clone(),
            district: d.district.clone(),
            consumption,
            tariff: tariff.name.clone(),
            amount_due,
            message: notice_text(&d.owner_name, consumption, &tariff.name, amount_due),
        }
    }

    /// Notification for a local phone number, prefixed with the country code.
    pub fn notification(&self, local_phone: &str, tariff: &TariffConfig) -> NotificationRequest {
        let digits = local_phone.trim();
        let phone = if digits.starts_with('+') {
            digits.to_string()
        } else {
            format!("{}{}", tariff.phone_prefix, digits)
        };
        NotificationRequest {
            phone,
            message: self.message.clone(),
        }
    }
}

fn notice_text(customer: &str, consumption: f64, tariff: &str, amount_due: f64) -> String {
    format!(
        "SEMAPA - Recibo generado\nCliente: {customer}\nConsumo: {consumption} m³\nTarifa: {tariff}\nTotal Bs: {amount_due:.2}"
    )
}

pub fn notices(markers: &[MeterMarker], tariff: &TariffConfig) -> Vec<ReceiptNotice> {
    markers
        .iter()
        .map(|m| ReceiptNotice::from_marker(m, tariff))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::meter_map::{MarkerDetails, HOUR_SLOTS};

    fn marker(flow: [f64; HOUR_SLOTS]) -> MeterMarker {
        MeterMarker {
            id: 3,
            position: [-17.39, -66.15],
            details: MarkerDetails {
                account: "u-1".to_string(),
                owner_name: "Ana Rojas".to_string(),
                district: "Distrito 9".to_string(),
                zone: "Norte".to_string(),
                meter_label: "abcdef (-)".to_string(),
                hourly_flow: flow,
            },
        }
    }

    #[test]
    fn amount_due_applies_the_tariff_rate() {
        let mut flow = [0.0; HOUR_SLOTS];
        flow[0] = 1.5;
        flow[7] = 2.5;

        let notice = ReceiptNotice::from_marker(&marker(flow), &TariffConfig::default());

        assert_eq!(notice.consumption, 4.0);
        assert_eq!(notice.amount_due, 10.0);
        assert_eq!(notice.tariff, "Tarifa Básica");
        assert_eq!(
            notice.message,
            "SEMAPA - Recibo generado\nCliente: Ana Rojas\nConsumo: 4 m³\nTarifa: Tarifa Básica\nTotal Bs: 10.00"
        );
    }

    #[test]
    fn notification_prefixes_local_numbers_only() {
        let tariff = TariffConfig::default();
        let notice = ReceiptNotice::from_marker(&marker([0.0; HOUR_SLOTS]), &tariff);

        assert_eq!(notice.notification("75961504", &tariff).phone, "+59175961504");
        assert_eq!(notice.notification("+5491100000000", &tariff).phone, "+5491100000000");
        assert_eq!(notice.notification("75961504", &tariff).message, notice.message);
    }

    #[test]
    fn one_notice_per_marker() {
        let markers = vec![marker([0.1; HOUR_SLOTS]), marker([0.0; HOUR_SLOTS])];
        let all = notices(&markers, &TariffConfig::default());

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].consumption, 1.2);
        assert_eq!(all[0].amount_due, 3.0);
    }
}
