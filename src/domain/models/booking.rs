use serde::{Deserialize, Deserializer, Serialize};

fn lenient_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|h: &f64| h.is_finite()))
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BookingRequest {
    pub id: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub preferred_time: String,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub booking_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tour_timezone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Paid,
    Accepted,
    Pending,
    Maybe,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Paid => "paid",
            Confirmation::Accepted => "accepted",
            Confirmation::Pending => "pending",
            Confirmation::Maybe => "maybe",
        }
    }
}

impl BookingRequest {
    pub fn confirmation(&self) -> Option<Confirmation> {
        let status = self.status.trim().to_lowercase();
        let payment = self.payment_status.trim().to_lowercase();

        // legacy records stored payment in the status field
        let paid = payment == "paid" || status == "paid";
        match status.as_str() {
            "declined" | "cancelled" | "canceled" | "blacklisted" => None,
            _ if paid => Some(Confirmation::Paid),
            "accepted" => Some(Confirmation::Accepted),
            "" | "pending" => Some(Confirmation::Pending),
            "maybe" => Some(Confirmation::Maybe),
            _ => None,
        }
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        let hours = self.duration_hours?;
        if hours <= 0.0 {
            return None;
        }
        let minutes = (hours * 60.0).round();
        (minutes >= 1.0).then_some(minutes as u32)
    }

    pub fn label(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| "Booking".to_string())
    }
}
