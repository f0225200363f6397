use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub body: String,
}

impl Post {
    pub fn new(id: i64, body: &str) -> Post {
        Post {
            id: id,
            body: body.to_string(),
        }
    }
}

/// Payload of `POST /posts`. Any `id` sent by the client is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_json_shape() {
        let post = Post::new(1, "hello");
        let json = serde_json::to_string(&post).unwrap();
        assert_eq!(json, r#"{"id":1,"body":"hello"}"#);

        let decoded: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, post);
    }

    #[test]
    fn new_post_ignores_client_id() {
        let new_post: NewPost = serde_json::from_str(r#"{"id":42,"body":"x"}"#).unwrap();
        assert_eq!(new_post.body, "x");
    }

    #[test]
    fn new_post_missing_body_is_empty() {
        let new_post: NewPost = serde_json::from_str("{}").unwrap();
        assert_eq!(new_post.body, "");
    }

    #[test]
    fn new_post_rejects_non_string_body() {
        assert!(serde_json::from_str::<NewPost>(r#"{"body":5}"#).is_err());
        assert!(serde_json::from_str::<NewPost>("{\"body\":").is_err());
    }
}
