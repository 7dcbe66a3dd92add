use serde_json::{Map, Value};

use crate::fixtures;
use crate::models::{AttributeRecord, DeviceInfo, EventRecord, FeedbackRecord, IngestRequest};
use crate::validate::{
    coerce_count, display_or_nil, event_label, flag_is_true, render_value, require_present, Halt,
};

// Validates the payload in fixed order and assembles the response body.
// The first failed check wins; later fields are never inspected.
pub fn process(request: &IngestRequest, now: i64) -> Result<Map<String, Value>, Halt> {
    let time = require_present(request.time.as_ref(), "time")?;
    let sdk_version = require_present(request.sdk_version.as_ref(), "sdk_version")?;
    let device_id = require_present(request.device_id.as_ref(), "device_id")?;

    tracing::info!(
        timestamp = %render_value(time),
        sdk_version = %render_value(sdk_version),
        app_version = %display_or_nil(request.app_version.as_ref()),
        device_id = %render_value(device_id),
        "received data"
    );

    if let Some(device) = &request.device {
        verify_device(device, "");
    }
    if let Some(events) = &request.events {
        validate_events(events)?;
    }
    if let Some(attributes) = &request.attributes {
        log_attributes(attributes);
    }
    if let Some(feedback) = &request.feedback {
        validate_feedback(feedback)?;
    }

    let mut body = Map::new();
    if let Some(directive) = &request.respond_with {
        if flag_is_true(directive.feed.as_ref()) {
            body.insert("feed".to_string(), Value::Array(fixtures::feed_cards(now)));
        }

        if let Some(message_directive) = &directive.in_app_message {
            let mut messages = fixtures::in_app_messages(request.api_key.as_deref());
            if !flag_is_true(message_directive.all.as_ref()) {
                messages.truncate(coerce_count(message_directive.count.as_ref()));
            }
            body.insert("in_app_message".to_string(), Value::Array(messages));
        }

        if let Some(config) = &directive.config {
            // The message text lacks the word "must"; existing clients
            // match on it verbatim, so it stays as is.
            let config_time = config
                .config_time
                .as_ref()
                .ok_or_else(|| Halt::new("config_time not be nil"))?;
            tracing::info!(config_time = %render_value(config_time), "received config request");
            body.insert("config".to_string(), fixtures::config_body(now));
        }
    }

    Ok(body)
}

fn verify_device(device: &DeviceInfo, source: &str) {
    tracing::info!(
        source = source,
        model = %display_or_nil(device.model.as_ref()),
        os_version = %display_or_nil(device.os_version.as_ref()),
        carrier = %display_or_nil(device.carrier.as_ref()),
        resolution = %display_or_nil(device.resolution.as_ref()),
        locale = %display_or_nil(device.locale.as_ref()),
        time_zone = %display_or_nil(device.time_zone.as_ref()),
        ios_idfv = %display_or_nil(device.ios_idfv.as_ref()),
        ios_idfa = %display_or_nil(device.ios_idfa.as_ref()),
        google_ad_id = %display_or_nil(device.google_ad_id.as_ref()),
        browser = %display_or_nil(device.browser.as_ref()),
        "received device info"
    );
}

fn validate_events(events: &[EventRecord]) -> Result<(), Halt> {
    tracing::info!(count = events.len(), "received events");
    for event in events {
        let name = require_present(event.name.as_ref(), "event name")?;
        let label = name.as_str().and_then(event_label).ok_or_else(|| {
            Halt::new(format!(
                "received invalid event name {}",
                render_value(name)
            ))
        })?;
        let time = require_present(event.time.as_ref(), "event time")?;
        let data = require_present(event.data.as_ref(), "event data")?;

        tracing::info!(
            event_type = label,
            time = %render_value(time),
            data = %data,
            session_id = %display_or_nil(event.session_id.as_ref()),
            user_id = %display_or_nil(event.user_id.as_ref()),
            "received event"
        );
    }
    Ok(())
}

fn log_attributes(attributes: &[AttributeRecord]) {
    for record in attributes {
        tracing::info!(
            user_id = %display_or_nil(record.user_id.as_ref()),
            custom = %display_or_nil(record.custom.as_ref()),
            push_token = %display_or_nil(record.push_token.as_ref()),
            first_name = %display_or_nil(record.first_name.as_ref()),
            last_name = %display_or_nil(record.last_name.as_ref()),
            email = %display_or_nil(record.email.as_ref()),
            dob = %display_or_nil(record.dob.as_ref()),
            country = %display_or_nil(record.country.as_ref()),
            home_city = %display_or_nil(record.home_city.as_ref()),
            bio = %display_or_nil(record.bio.as_ref()),
            gender = %display_or_nil(record.gender.as_ref()),
            phone = %display_or_nil(record.phone.as_ref()),
            email_subscribe = %display_or_nil(record.email_subscribe.as_ref()),
            push_subscribe = %display_or_nil(record.push_subscribe.as_ref()),
            image_url = %display_or_nil(record.image_url.as_ref()),
            facebook = %display_or_nil(record.facebook.as_ref()),
            twitter = %display_or_nil(record.twitter.as_ref()),
            foursquare = %display_or_nil(record.foursquare.as_ref()),
            foursquare_access_token = %display_or_nil(record.foursquare_access_token.as_ref()),
            "received attributes"
        );
    }
}

fn validate_feedback(feedback: &[FeedbackRecord]) -> Result<(), Halt> {
    for record in feedback {
        let message = require_present(record.message.as_ref(), "feedback message")?;
        let is_bug = require_present(record.is_bug.as_ref(), "feedback is_bug")?;
        let reply_to = require_present(record.reply_to.as_ref(), "feedback reply_to")?;

        tracing::info!(
            message = %render_value(message),
            is_bug = %render_value(is_bug),
            reply_to = %render_value(reply_to),
            user_id = %display_or_nil(record.user_id.as_ref()),
            "received feedback"
        );

        if let Some(device) = &record.device {
            verify_device(device, "feedback");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::process;
    use crate::fixtures::{DAY, MONTH};
    use crate::models::IngestRequest;

    const NOW: i64 = 1_600_000_000;

    fn request(payload: Value) -> IngestRequest {
        serde_json::from_value(payload).expect("decode request")
    }

    fn valid(extra: Value) -> IngestRequest {
        let mut payload = json!({
            "time": 1500000000,
            "sdk_version": "2.1",
            "device_id": "device-1"
        });
        payload
            .as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        request(payload)
    }

    #[test]
    fn first_missing_field_wins() {
        let err = process(&request(json!({})), NOW).unwrap_err();
        assert_eq!(err.message, "time must not be nil");

        let err = process(&request(json!({"time": 1, "device_id": "d"})), NOW).unwrap_err();
        assert_eq!(err.message, "sdk_version must not be nil");

        let err = process(&request(json!({"time": 1, "sdk_version": "2.1"})), NOW).unwrap_err();
        assert_eq!(err.message, "device_id must not be nil");
    }

    #[test]
    fn null_counts_as_missing() {
        let err = process(
            &request(json!({"time": null, "sdk_version": "2.1", "device_id": "d"})),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err.message, "time must not be nil");
    }

    #[test]
    fn minimal_request_yields_empty_body() {
        let body = process(&valid(json!({})), NOW).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn event_requires_name_time_and_data_in_order() {
        let err = process(&valid(json!({"events": [{}]})), NOW).unwrap_err();
        assert_eq!(err.message, "event name must not be nil");

        let err = process(&valid(json!({"events": [{"name": "ce"}]})), NOW).unwrap_err();
        assert_eq!(err.message, "event time must not be nil");

        let err = process(&valid(json!({"events": [{"name": "ce", "time": 5}]})), NOW).unwrap_err();
        assert_eq!(err.message, "event data must not be nil");
    }

    #[test]
    fn unknown_event_name_halts_before_later_events() {
        let err = process(
            &valid(json!({"events": [
                {"name": "zz", "time": 5, "data": {}},
                {"name": "ce", "time": 6, "data": {}}
            ]})),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err.message, "received invalid event name zz");
    }

    #[test]
    fn non_string_event_name_is_invalid() {
        let err = process(
            &valid(json!({"events": [{"name": 5, "time": 1, "data": {}}]})),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err.message, "received invalid event name 5");
    }

    #[test]
    fn valid_events_pass() {
        let body = process(
            &valid(json!({"events": [
                {"name": "ss", "time": 1, "data": {"d": 1}, "session_id": "s1"},
                {"name": "se", "time": 2, "data": {}}
            ]})),
            NOW,
        )
        .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn attributes_never_halt() {
        let body = process(
            &valid(json!({"attributes": [{}, {"first_name": "Jake", "email": "j@example.com"}]})),
            NOW,
        )
        .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn feedback_requires_fields_in_order() {
        let err = process(&valid(json!({"feedback": [{}]})), NOW).unwrap_err();
        assert_eq!(err.message, "feedback message must not be nil");

        let err = process(&valid(json!({"feedback": [{"message": "hi"}]})), NOW).unwrap_err();
        assert_eq!(err.message, "feedback is_bug must not be nil");

        let err = process(
            &valid(json!({"feedback": [{"message": "hi", "is_bug": true}]})),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err.message, "feedback reply_to must not be nil");
    }

    #[test]
    fn feed_directive_attaches_recomputed_cards() {
        let body = process(&valid(json!({"respond_with": {"feed": true}})), NOW).unwrap();
        let feed = body["feed"].as_array().unwrap();
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0]["created"].as_i64().unwrap(), NOW - 3 * MONTH);
        assert_eq!(feed[0]["updated"].as_i64().unwrap(), NOW - 3 * DAY);
    }

    #[test]
    fn feed_flag_accepts_true_string() {
        let body = process(&valid(json!({"respond_with": {"feed": "true"}})), NOW).unwrap();
        assert!(body.contains_key("feed"));

        let body = process(&valid(json!({"respond_with": {"feed": false}})), NOW).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn in_app_count_truncates_the_array_variant() {
        let body = process(
            &valid(json!({
                "api_key": "array",
                "respond_with": {"in_app_message": {"count": 2}}
            })),
            NOW,
        )
        .unwrap();
        let messages = body["in_app_message"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0]["campaign_id"].is_string());
        assert_eq!(messages[1]["type"], "MODAL");
    }

    #[test]
    fn in_app_all_flag_overrides_count() {
        let body = process(
            &valid(json!({
                "api_key": "array",
                "respond_with": {"in_app_message": {"all": true, "count": 1}}
            })),
            NOW,
        )
        .unwrap();
        assert_eq!(body["in_app_message"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn in_app_missing_count_yields_empty_list() {
        let body = process(&valid(json!({"respond_with": {"in_app_message": {}}})), NOW).unwrap();
        assert_eq!(body["in_app_message"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn config_requires_config_time() {
        let err = process(&valid(json!({"respond_with": {"config": {}}})), NOW).unwrap_err();
        assert_eq!(err.message, "config_time not be nil");
    }

    #[test]
    fn config_attaches_server_time_and_blacklists() {
        let body = process(
            &valid(json!({"respond_with": {"config": {"config_time": 1234}}})),
            NOW,
        )
        .unwrap();
        let config = &body["config"];
        assert_eq!(config["time"].as_i64().unwrap(), NOW);
        assert_eq!(
            config["events_blacklist"],
            json!(["blacklisted_event1", "blacklisted_event2"])
        );
    }

    #[test]
    fn halt_reports_only_the_error() {
        // A halt never carries partially assembled response fields.
        let err = process(
            &valid(json!({"respond_with": {"feed": true, "config": {}}})),
            NOW,
        )
        .unwrap_err();
        assert_eq!(err.message, "config_time not be nil");
    }

    #[test]
    fn directives_compose() {
        let body = process(
            &valid(json!({
                "api_key": "modal",
                "respond_with": {
                    "feed": true,
                    "in_app_message": {"count": 1},
                    "config": {"config_time": 99}
                }
            })),
            NOW,
        )
        .unwrap();
        assert_eq!(body["feed"].as_array().unwrap().len(), 5);
        assert_eq!(body["in_app_message"].as_array().unwrap()[0]["type"], "MODAL");
        assert_eq!(body["config"]["time"].as_i64().unwrap(), NOW);
    }
}
