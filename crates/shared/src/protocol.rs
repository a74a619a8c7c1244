use serde::{Deserialize, Serialize};


pub fn pins_route() -> &'static str {
    "/pins"
}

/// Body of `POST /pins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPinRequest {
    pub username: String,
    pub title: String,
    pub desc: String,
    pub rating: u8,
    pub lat: f64,
    pub long: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Pin, PinId};

    #[test]
    fn pin_accepts_document_store_identifier() {
        let raw = r#"{"_id":"abc","username":"a","title":"T","desc":"D","rating":3,"lat":10,"long":20,"createdAt":"2020-01-01"}"#;
        let pin: Pin = serde_json::from_str(raw).expect("pin");
        assert_eq!(pin.id, PinId::new("abc"));
        assert_eq!(pin.lat, 10.0);
        assert_eq!(pin.created_at, "2020-01-01");
    }

    #[test]
    fn pin_serializes_camel_case_created_at() {
        let pin = Pin {
            id: PinId::new("1"),
            username: "a".to_string(),
            title: "T".to_string(),
            desc: "D".to_string(),
            rating: 3,
            lat: 10.0,
            long: 20.0,
            created_at: "2020-01-01".to_string(),
        };
        let value = serde_json::to_value(&pin).expect("json");
        assert_eq!(value["createdAt"], "2020-01-01");
        assert_eq!(value["id"], "1");
    }

    #[test]
    fn new_pin_request_uses_backend_field_names() {
        let request = NewPinRequest {
            username: "alice".to_string(),
            title: "X".to_string(),
            desc: "Y".to_string(),
            rating: 4,
            lat: 5.0,
            long: 6.0,
        };
        let value = serde_json::to_value(&request).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "username": "alice",
                "title": "X",
                "desc": "Y",
                "rating": 4,
                "lat": 5.0,
                "long": 6.0
            })
        );
    }
}
