use serde::{Deserialize, Serialize};

/// A titled section of an answer, made of subpods.
///
/// A pod may be flagged as errored even when the overall result succeeded;
/// such pods are not shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    /// Display title, e.g. "Input interpretation" or "Result".
    pub title: String,
    /// Engine identifier for the pod, e.g. "Result".
    pub id: String,
    /// Name of the engine scanner that produced the pod.
    pub scanner: String,
    /// The engine failed to compute this pod.
    pub is_error: bool,
    /// Subpods in engine order.
    pub subpods: Vec<Subpod>,
}

impl Pod {
    /// Returns the pod title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the subpods.
    pub fn subpods(&self) -> &[Subpod] {
        &self.subpods
    }

    /// Concatenates the text of every plain-text element across all subpods.
    ///
    /// Subpods are visited in order, and elements within each subpod in order.
    /// Images, MathML and sounds contribute nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use voiceassist::{ContentElement, PodBuilder, Subpod};
    ///
    /// let pod = PodBuilder::new()
    ///     .title("Result")
    ///     .subpod(Subpod::new(vec![
    ///         ContentElement::plain_text("4"),
    ///         ContentElement::MathMl("<math/>".to_string()),
    ///     ]))
    ///     .subpod(Subpod::new(vec![ContentElement::plain_text("2")]))
    ///     .build();
    ///
    /// assert_eq!(pod.plain_text(), "42");
    /// ```
    pub fn plain_text(&self) -> String {
        self.subpods
            .iter()
            .flat_map(|subpod| &subpod.contents)
            .filter_map(ContentElement::as_plain_text)
            .collect()
    }
}

/// A sub-section of a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subpod {
    /// Subpod title; usually empty.
    pub title: String,
    /// Content elements in engine order.
    pub contents: Vec<ContentElement>,
}

impl Subpod {
    /// Creates an untitled subpod with the given contents.
    pub fn new(contents: Vec<ContentElement>) -> Self {
        Self {
            title: String::new(),
            contents,
        }
    }
}

/// One piece of rendered content within a subpod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentElement {
    /// Plain text rendering; the only variant shown in the result list.
    PlainText(String),
    /// Image rendering.
    Image(Image),
    /// MathML markup.
    MathMl(String),
    /// Audio rendering.
    Sound(Sound),
}

impl ContentElement {
    /// Creates a plain-text element.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::PlainText(text.into())
    }

    /// Returns the text if this is a plain-text element.
    pub fn as_plain_text(&self) -> Option<&str> {
        match self {
            Self::PlainText(text) => Some(text),
            Self::Image(_) | Self::MathMl(_) | Self::Sound(_) => None,
        }
    }
}

/// An image hosted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// An audio clip hosted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub url: String,
    pub mime_type: String,
}

/// Builder for constructing `Pod` instances with optional fields.
///
/// # Examples
///
/// ```
/// use voiceassist::{ContentElement, PodBuilder, Subpod};
///
/// let pod = PodBuilder::new()
///     .title("Result")
///     .subpod(Subpod::new(vec![ContentElement::plain_text("42")]))
///     .build();
///
/// assert_eq!(pod.title(), "Result");
/// assert!(!pod.is_error);
/// ```
#[derive(Debug, Default)]
pub struct PodBuilder {
    title: Option<String>,
    id: Option<String>,
    scanner: Option<String>,
    is_error: bool,
    subpods: Vec<Subpod>,
}

impl PodBuilder {
    /// Creates a new `PodBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pod title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the pod identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the scanner name.
    pub fn scanner(mut self, scanner: impl Into<String>) -> Self {
        self.scanner = Some(scanner.into());
        self
    }

    /// Sets the error flag.
    pub fn error(mut self, is_error: bool) -> Self {
        self.is_error = is_error;
        self
    }

    /// Appends a subpod.
    pub fn subpod(mut self, subpod: Subpod) -> Self {
        self.subpods.push(subpod);
        self
    }

    /// Appends a subpod holding a single plain-text element.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.subpod(Subpod::new(vec![ContentElement::plain_text(text)]))
    }

    /// Builds the `Pod`. The id defaults to the title.
    pub fn build(self) -> Pod {
        let title = self.title.unwrap_or_default();
        Pod {
            id: self.id.unwrap_or_else(|| title.clone()),
            title,
            scanner: self.scanner.unwrap_or_default(),
            is_error: self.is_error,
            subpods: self.subpods,
        }
    }
}
