use serde_json::{json, Value};

pub const HOUR: i64 = 3600;
pub const DAY: i64 = 86_400;
pub const MONTH: i64 = 30 * DAY;

// Card timestamps are relative to the serving time, so the feed always
// looks recent to clients; never cache the result.
pub fn feed_cards(now: i64) -> Vec<Value> {
    vec![
        json!({
            "id": "crosspromosmall1",
            "viewed": false,
            "type": "cross_promotion_small",
            "title": "Hair MakeOver - Home Edition",
            "subtitle": "Lifestyle, Entertainment",
            "caption": "Recommended",
            "image": "http://www.image.com/foo.png",
            "rating": 4.0,
            "reviews": 10000,
            "price": 0.25,
            "url": "https://itunes.apple.com/foo",
            "media_type": "ItunesSoftware",
            "itunes_id": 560147174,
            "created": now - 3 * MONTH,
            "updated": now - 3 * DAY,
            "categories": ["news"],
            "expires_at": now + DAY,
            "display_price": "£3.33",
            "universal": true
        }),
        json!({
            "id": "captioned1",
            "viewed": false,
            "type": "captioned_image",
            "image": "http://www.image.com/foo.jpg",
            "title": "Jake's Bar",
            "description": "Come to Jake's bar tonight for free food!",
            "created": now - 2 * MONTH,
            "updated": now - 2 * DAY,
            "categories": [],
            "expires_at": now + 2 * HOUR,
            "url": "http://www.jakesbar.com",
            "domain": "jakesbar.com",
            "aspect_ratio": 1.33333
        }),
        json!({
            "id": "text1",
            "viewed": false,
            "type": "text_announcement",
            "title": "Plants vs. Zombies version 90.1",
            "description": "Plants vs. Zombies fans, we're getting ready to release foo",
            "created": now - 2 * MONTH,
            "updated": now - DAY,
            "categories": [],
            "expires_at": now + 2 * HOUR,
            "url": "http://tapbots.com/announcement",
            "domain": "jakesbar.com"
        }),
        json!({
            "id": "news1",
            "viewed": false,
            "type": "short_news",
            "description": "Thanks for supporting us!",
            "image": "http://www.image.com/foo",
            "created": now - 2 * MONTH,
            "updated": now - DAY,
            "categories": [],
            "expires_at": now + 2 * HOUR,
            "title": "Tapbots hits 1MM downloads!",
            "url": "http://tapbots.com/announcement",
            "domain": "tapbots.com"
        }),
        json!({
            "id": "banner1",
            "viewed": false,
            "type": "banner_image",
            "image": "http://www.image.com/foo.png",
            "created": now - 2 * MONTH,
            "updated": now - DAY,
            "categories": [],
            "expires_at": now + 2 * HOUR,
            "url": "http://www.myapp.com",
            "domain": "myapp.com",
            "aspect_ratio": 6.1045
        }),
    ]
}

// The api_key doubles as the variant selector for in-app messages.
pub fn in_app_messages(api_key: Option<&str>) -> Vec<Value> {
    match api_key {
        Some("modal") => vec![modal_message()],
        Some("full") => vec![full_message()],
        Some("array") => vec![basic_message(), modal_message(), full_message()],
        _ => vec![basic_message()],
    }
}

fn basic_message() -> Value {
    json!({
        "message": "This is an in-app message from the stub API!",
        "duration": 2000,
        "slide_from": "TOP",
        "extras": [{"my key": "my value"}],
        "campaign_id": "campaign_id of in-app message",
        "click_action": "URI",
        "uri": "http://google.com",
        "message_close": "AUTO_DISMISS",
        "icon": "\u{f042}",
        "icon_color": 4294901760u64
    })
}

fn modal_message() -> Value {
    json!({
        "message": "This is a modal in-app message from the stub API!",
        "duration": 2000,
        "slide_from": "TOP",
        "extras": [{"my key": "my value"}],
        "card_id": "card_id of in-app message",
        "click_action": "URI",
        "uri": "http://google.com",
        "message_close": "SWIPE",
        "type": "MODAL",
        "image_url": "http://i.imgur.com/K7HPBHF.gif",
        "header": "This is my header"
    })
}

fn full_message() -> Value {
    json!({
        "message": "This is a full-screen in-app message from the stub API!",
        "duration": 2000,
        "slide_from": "TOP",
        "extras": [{"my key": "my value"}],
        "card_id": "card_id of in-app message",
        "click_action": "URI",
        "uri": "http://google.com",
        "message_close": "SWIPE",
        "type": "FULL",
        "image_url": "http://i.imgur.com/tpK7ojq.gif",
        "btns": [
            {"text": "Goes to Google", "click_action": "URI", "uri": "http://google.com"},
            {"text": "Does Nothing"}
        ]
    })
}

pub fn config_body(now: i64) -> Value {
    json!({
        "time": now,
        "events_blacklist": ["blacklisted_event1", "blacklisted_event2"],
        "attributes_blacklist": ["blacklisted_attribute1", "blacklisted_attribute2"],
        "purchases_blacklist": ["blacklisted_purchase1", "blacklisted_purchase2"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_600_000_000;

    #[test]
    fn feed_cards_keep_order_and_relative_times() {
        let cards = feed_cards(NOW);
        let ids: Vec<&str> = cards
            .iter()
            .map(|card| card["id"].as_str().unwrap())
            .collect();
        assert_eq!(
            ids,
            ["crosspromosmall1", "captioned1", "text1", "news1", "banner1"]
        );

        let promo = &cards[0];
        assert_eq!(promo["type"], "cross_promotion_small");
        assert_eq!(promo["viewed"], false);
        assert_eq!(promo["created"].as_i64().unwrap(), NOW - 3 * MONTH);
        assert_eq!(promo["updated"].as_i64().unwrap(), NOW - 3 * DAY);
        assert_eq!(promo["expires_at"].as_i64().unwrap(), NOW + DAY);

        let banner = &cards[4];
        assert_eq!(banner["type"], "banner_image");
        assert_eq!(banner["created"].as_i64().unwrap(), NOW - 2 * MONTH);
        assert_eq!(banner["expires_at"].as_i64().unwrap(), NOW + 2 * HOUR);
    }

    #[test]
    fn in_app_variants_follow_api_key() {
        let array = in_app_messages(Some("array"));
        assert_eq!(array.len(), 3);
        assert!(array[0]["campaign_id"].is_string());
        assert_eq!(array[1]["type"], "MODAL");
        assert_eq!(array[2]["type"], "FULL");

        assert_eq!(in_app_messages(Some("modal"))[0]["type"], "MODAL");
        assert_eq!(in_app_messages(Some("full"))[0]["type"], "FULL");
        assert!(in_app_messages(None)[0]["campaign_id"].is_string());
        assert!(in_app_messages(Some("anything"))[0]["campaign_id"].is_string());
    }

    #[test]
    fn config_lists_all_blacklists() {
        let config = config_body(NOW);
        assert_eq!(config["time"].as_i64().unwrap(), NOW);
        assert_eq!(
            config["events_blacklist"],
            serde_json::json!(["blacklisted_event1", "blacklisted_event2"])
        );
        assert_eq!(
            config["attributes_blacklist"],
            serde_json::json!(["blacklisted_attribute1", "blacklisted_attribute2"])
        );
        assert_eq!(
            config["purchases_blacklist"],
            serde_json::json!(["blacklisted_purchase1", "blacklisted_purchase2"])
        );
    }
}
