use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn format_amz_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn format_amz_short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// The cluster encodes "unset" timestamps as `0001-01-01T00:00:00Z`.
pub fn is_zero_time(dt: &DateTime<Utc>) -> bool {
    dt.timestamp() <= ZERO_TIME_UNIX
}

const ZERO_TIME_UNIX: i64 = -62_135_596_800;

/// Serde adapter mapping the wire zero time (or `null`) to `None`.
pub mod zero_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::is_zero_time;

    const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_str(ZERO_TIME),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<DateTime<Utc>>::deserialize(deserializer)?;
        Ok(value.filter(|dt| !is_zero_time(dt)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Stamp {
        #[serde(with = "zero_time", default)]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn zero_time_decodes_to_none() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"0001-01-01T00:00:00Z"}"#).unwrap();
        assert!(stamp.at.is_none());

        let stamp: Stamp = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(stamp.at.is_none());

        let stamp: Stamp = serde_json::from_str("{}").unwrap();
        assert!(stamp.at.is_none());
    }

    #[test]
    fn real_time_is_kept() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"2024-05-01T12:00:00Z"}"#).unwrap();
        assert_eq!(
            stamp.at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn none_encodes_as_zero_time() {
        let json = serde_json::to_string(&Stamp { at: None }).unwrap();
        assert_eq!(json, r#"{"at":"0001-01-01T00:00:00Z"}"#);
    }

    #[test]
    fn amz_dates() {
        let dt = Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0).unwrap();
        assert_eq!(format_amz_date(&dt), "20130524T000000Z");
        assert_eq!(format_amz_short_date(&dt), "20130524");
    }
}
