use serde_json::Value;

use crate::contract::ResumeRecord;

pub const RESUME_KEY_ATTRIBUTE: &str = "resume_key";

/// Object key for a freshly uploaded file. Without a prefix the key is the
/// generated identifier itself.
pub fn upload_object_key(base_prefix: Option<&str>, object_id: &str) -> String {
    match base_prefix.map(|prefix| prefix.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{object_id}"),
        _ => object_id.to_string(),
    }
}

/// The stored object reference of a resume record, if it is a usable key.
pub fn resume_object_key(record: &ResumeRecord) -> Option<&str> {
    match record.get(RESUME_KEY_ATTRIBUTE) {
        Some(Value::String(key)) if !key.is_empty() => Some(key.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_identifier_without_prefix() {
        assert_eq!(
            upload_object_key(None, "0b6f8a2e-5d1c-4c1e-9c55-3f0f6c9e2a10"),
            "0b6f8a2e-5d1c-4c1e-9c55-3f0f6c9e2a10"
        );
        assert_eq!(upload_object_key(Some("//"), "abc"), "abc");
    }

    #[test]
    fn prefix_is_trimmed_and_joined() {
        assert_eq!(upload_object_key(Some("/resumes/incoming/"), "abc"), "resumes/incoming/abc");
    }

    #[test]
    fn resume_object_key_requires_non_empty_string() {
        let record = json!({"resume_key": "uploads/cv.pdf"});
        assert_eq!(
            resume_object_key(record.as_object().expect("object")),
            Some("uploads/cv.pdf")
        );

        let record = json!({"resume_key": 42});
        assert_eq!(resume_object_key(record.as_object().expect("object")), None);

        let record = json!({"id": "r-1"});
        assert_eq!(resume_object_key(record.as_object().expect("object")), None);
    }
}
