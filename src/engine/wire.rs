//! JSON decoding for the Wolfram|Alpha `output=json` response format.
//!
//! The engine wraps everything in a `queryresult` object. Flags arrive as
//! booleans (older deployments send `"true"`/`"false"` strings), and `error`
//! is either a flag or an object carrying `code` and `msg`.

use serde::{Deserialize, Deserializer};

use crate::models::{ContentElement, Image, Pod, QueryResult, Sound, Subpod};

/// Treats an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct Envelope {
    queryresult: WireQueryResult,
}

#[derive(Debug, Default, Deserialize)]
struct WireQueryResult {
    #[serde(default, deserialize_with = "null_as_default")]
    success: Flag,
    #[serde(default, deserialize_with = "null_as_default")]
    error: WireError,
    #[serde(default, deserialize_with = "null_as_default")]
    pods: Vec<WirePod>,
    #[serde(default)]
    timing: Option<f64>,
    #[serde(default)]
    datatypes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Default for Flag {
    fn default() -> Self {
        Self::Bool(false)
    }
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(value) => value.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireError {
    Flag(Flag),
    Detail {
        #[serde(default)]
        code: Option<serde_json::Value>,
        #[serde(default)]
        msg: Option<String>,
    },
}

impl Default for WireError {
    fn default() -> Self {
        Self::Flag(Flag::default())
    }
}

impl WireError {
    fn is_error(&self) -> bool {
        match self {
            Self::Flag(flag) => flag.is_set(),
            Self::Detail { .. } => true,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            Self::Flag(_) => None,
            Self::Detail { msg, code } => match (msg.as_deref().map(str::trim), code) {
                (Some(msg), _) if !msg.is_empty() => Some(msg.to_string()),
                (_, Some(code)) => Some(format!("Engine error code {}", display_code(code))),
                _ => None,
            },
        }
    }
}

fn display_code(code: &serde_json::Value) -> String {
    match code {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct WirePod {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    scanner: String,
    #[serde(default, deserialize_with = "null_as_default")]
    error: WireError,
    #[serde(default, deserialize_with = "null_as_default")]
    subpods: Vec<WireSubpod>,
}

#[derive(Debug, Deserialize)]
struct WireSubpod {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    img: Option<WireImage>,
    plaintext: Option<String>,
    mathml: Option<String>,
    sound: Option<WireSound>,
}

#[derive(Debug, Deserialize)]
struct WireImage {
    #[serde(default, deserialize_with = "null_as_default")]
    src: String,
    #[serde(default, deserialize_with = "null_as_default")]
    alt: String,
}

#[derive(Debug, Deserialize)]
struct WireSound {
    #[serde(default, deserialize_with = "null_as_default")]
    url: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    mime_type: String,
}

impl From<WireSubpod> for Subpod {
    fn from(wire: WireSubpod) -> Self {
        let mut contents = Vec::new();
        if let Some(img) = wire.img {
            contents.push(ContentElement::Image(Image {
                src: img.src,
                alt: img.alt,
            }));
        }
        if let Some(text) = wire.plaintext {
            contents.push(ContentElement::PlainText(text));
        }
        if let Some(mathml) = wire.mathml {
            contents.push(ContentElement::MathMl(mathml));
        }
        if let Some(sound) = wire.sound {
            contents.push(ContentElement::Sound(Sound {
                url: sound.url,
                mime_type: sound.mime_type,
            }));
        }
        Subpod {
            title: wire.title,
            contents,
        }
    }
}

impl From<WirePod> for Pod {
    fn from(wire: WirePod) -> Self {
        Pod {
            title: wire.title,
            id: wire.id,
            scanner: wire.scanner,
            is_error: wire.error.is_error(),
            subpods: wire.subpods.into_iter().map(Subpod::from).collect(),
        }
    }
}

/// Decodes a Full Results API JSON body into a `QueryResult`.
///
/// # Errors
///
/// Returns the underlying `serde_json::Error` if the body is not JSON or
/// lacks the `queryresult` envelope.
///
/// # Examples
///
/// ```
/// use voiceassist::engine::decode_query_result;
///
/// let body = r#"{"queryresult": {"success": true, "error": false, "pods": [
///     {"title": "Result", "error": false, "subpods": [{"plaintext": "42"}]}
/// ]}}"#;
///
/// let result = decode_query_result(body).unwrap();
/// assert!(result.is_success);
/// assert_eq!(result.pods[0].plain_text(), "42");
/// ```
pub fn decode_query_result(body: &str) -> Result<QueryResult, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(body)?;
    let wire = envelope.queryresult;

    Ok(QueryResult {
        is_error: wire.error.is_error(),
        error_message: wire.error.message(),
        is_success: wire.success.is_set(),
        pods: wire.pods.into_iter().map(Pod::from).collect(),
        timing: wire.timing,
        data_types: wire.datatypes.filter(|d| !d.is_empty()),
    })
}
