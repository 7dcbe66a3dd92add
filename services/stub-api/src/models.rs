use serde::{Deserialize, Serialize};
use serde_json::Value;

// Request fields are Option<Value> so an absent key and a JSON null both
// read as missing, and so presence checks tolerate any value type.
#[derive(Deserialize)]
pub struct IngestRequest {
    pub time: Option<Value>,
    pub sdk_version: Option<Value>,
    pub device_id: Option<Value>,
    pub app_version: Option<Value>,
    pub device: Option<DeviceInfo>,
    pub events: Option<Vec<EventRecord>>,
    pub attributes: Option<Vec<AttributeRecord>>,
    pub feedback: Option<Vec<FeedbackRecord>>,
    pub respond_with: Option<RespondWith>,
    pub api_key: Option<String>,
}

#[derive(Deserialize)]
pub struct DeviceInfo {
    pub model: Option<Value>,
    pub os_version: Option<Value>,
    pub carrier: Option<Value>,
    pub resolution: Option<Value>,
    pub locale: Option<Value>,
    pub time_zone: Option<Value>,
    pub ios_idfv: Option<Value>,
    pub ios_idfa: Option<Value>,
    pub google_ad_id: Option<Value>,
    pub browser: Option<Value>,
}

#[derive(Deserialize)]
pub struct EventRecord {
    pub name: Option<Value>,
    pub time: Option<Value>,
    pub data: Option<Value>,
    pub session_id: Option<Value>,
    pub user_id: Option<Value>,
}

#[derive(Deserialize)]
pub struct AttributeRecord {
    pub user_id: Option<Value>,
    pub custom: Option<Value>,
    pub push_token: Option<Value>,
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
    pub dob: Option<Value>,
    pub country: Option<Value>,
    pub home_city: Option<Value>,
    pub bio: Option<Value>,
    pub gender: Option<Value>,
    pub phone: Option<Value>,
    pub email_subscribe: Option<Value>,
    pub push_subscribe: Option<Value>,
    pub image_url: Option<Value>,
    pub facebook: Option<Value>,
    pub twitter: Option<Value>,
    pub foursquare: Option<Value>,
    pub foursquare_access_token: Option<Value>,
}

#[derive(Deserialize)]
pub struct FeedbackRecord {
    pub message: Option<Value>,
    pub is_bug: Option<Value>,
    pub reply_to: Option<Value>,
    pub device: Option<DeviceInfo>,
    pub user_id: Option<Value>,
}

#[derive(Deserialize)]
pub struct RespondWith {
    pub feed: Option<Value>,
    pub in_app_message: Option<InAppMessageDirective>,
    pub config: Option<ConfigDirective>,
}

#[derive(Deserialize)]
pub struct InAppMessageDirective {
    pub all: Option<Value>,
    pub count: Option<Value>,
}

#[derive(Deserialize)]
pub struct ConfigDirective {
    pub config_time: Option<Value>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
