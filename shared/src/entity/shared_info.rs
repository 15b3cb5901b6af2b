use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's consent to share contact details with a brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedInfo {
    pub brand_id: i64,
    pub user_id: i64,
    pub creation_date: DateTime<Utc>,
}

impl SharedInfo {
    pub fn new(brand_id: i64, user_id: i64, creation_date: DateTime<Utc>) -> Self {
        SharedInfo {
            brand_id,
            user_id,
            creation_date,
        }
    }
}

const RECEIVER_TYPE_BRAND: &str = "brand";
const NOTIFICATION_TYPE_SHARED_INFO: &str = "shared_info";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationInput {
    pub receiver_id: i64,
    pub receiver_type: String,
    pub notification_type: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisInput {
    pub receiver_id: i64,
    pub receiver_type: String,
    pub sender_id: i64,
    pub sender_name: String,
}

/// Event detail emitted when a user shares contact info with a brand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedInfoEvent {
    pub notification_input: NotificationInput,
    pub analysis_input: AnalysisInput,
}

impl SharedInfoEvent {
    pub fn new(shared_info: &SharedInfo, user_name: &str) -> Self {
        SharedInfoEvent {
            notification_input: NotificationInput {
                receiver_id: shared_info.brand_id,
                receiver_type: RECEIVER_TYPE_BRAND.to_string(),
                notification_type: NOTIFICATION_TYPE_SHARED_INFO.to_string(),
                message: format!(
                    "{} has shared his/her contact info with your brand",
                    user_name
                ),
            },
            analysis_input: AnalysisInput {
                receiver_id: shared_info.brand_id,
                receiver_type: RECEIVER_TYPE_BRAND.to_string(),
                sender_id: shared_info.user_id,
                sender_name: user_name.to_string(),
            },
        }
    }

    pub fn brand_id(&self) -> i64 {
        self.notification_input.receiver_id
    }
}
