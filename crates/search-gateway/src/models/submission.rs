//! Submission model.

use serde::{Deserialize, Serialize};

/// A gist submitted for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Display name of the author.
    pub author: String,

    /// GitHub gist id; doubles as the document id in the index.
    pub gist_id: String,

    /// Keywords to index the gist under.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// GitHub login of the gist owner.
    pub owner: String,

    /// Project title.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_default_to_empty() {
        let s: Submission = serde_json::from_str(
            r#"{"author":"Ada","gistId":"g1","owner":"ada","title":"Waves"}"#,
        )
        .unwrap();
        assert!(s.keywords.is_empty());
        assert_eq!(s.gist_id, "g1");
    }

    #[test]
    fn test_missing_gist_id_is_rejected() {
        let result = serde_json::from_str::<Submission>(
            r#"{"author":"Ada","owner":"ada","title":"Waves"}"#,
        );
        assert!(result.is_err());
    }
}
