use super::FetchError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Extract `choices[0].message.content` from a chat-completion response
/// body. The content is returned verbatim, no trimming. Any body that
/// does not match the expected shape keeps its raw bytes in the error so
/// the caller can log them.
pub fn extract_content(body: &[u8]) -> Result<String, FetchError> {
    if body.is_empty() {
        return Err(FetchError::EmptyResponse);
    }

    let parse_err = || FetchError::Parse {
        raw: String::from_utf8_lossy(body).into_owned(),
    };

    let resp: ChatResponse = serde_json::from_slice(body).map_err(|_| parse_err())?;

    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(parse_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_content_verbatim() {
        let body = br#"{"choices":[{"message":{"content":"  hi there "}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "  hi there ");
    }

    #[test]
    fn empty_body_is_no_data() {
        assert!(matches!(extract_content(b""), Err(FetchError::EmptyResponse)));
    }

    #[test]
    fn missing_content_keeps_raw_body() {
        let body = br#"{"choices":[{"message":{}}]}"#;
        match extract_content(body) {
            Err(FetchError::Parse { raw }) => assert!(raw.contains("choices")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn api_error_body_is_parse_failure() {
        let body = br#"{"error":{"message":"invalid api key"}}"#;
        match extract_content(body) {
            Err(FetchError::Parse { raw }) => assert!(raw.contains("invalid api key")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_choices_is_parse_failure() {
        let body = br#"{"choices":[]}"#;
        assert!(matches!(extract_content(body), Err(FetchError::Parse { .. })));
    }
}
