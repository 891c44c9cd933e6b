use serde::Deserialize;

/// A load request received from the sender over the media channel.
///
/// Every field of the request is optional, the accessor methods return an empty default value
/// for each missing path within the request.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    #[serde(default)]
    pub media: Option<MediaInfo>,
    #[serde(default)]
    pub autoplay: Option<bool>,
}

/// The media information of a [LoadRequest].
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    #[serde(default)]
    pub content_id: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub metadata: Option<MediaInfoMetadata>,
    #[serde(default)]
    pub custom_data: Option<CustomData>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    /// The artwork images of the media, senders might send `null` for the list or its entries.
    #[serde(default)]
    pub images: Option<Vec<Option<MediaImage>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct MediaImage {
    #[serde(default)]
    pub url: Option<String>,
}

/// The receiver specific data of a [LoadRequest].
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomData {
    /// The url of the subtitle track for the media.
    #[serde(default)]
    pub subtitles: Option<String>,
}

impl LoadRequest {
    /// Create a new builder for a [LoadRequest].
    pub fn builder() -> LoadRequestBuilder {
        LoadRequestBuilder::default()
    }

    /// The url of the media content, or an empty string when missing.
    pub fn content_id(&self) -> &str {
        self.media
            .as_ref()
            .and_then(|e| e.content_id.as_deref())
            .unwrap_or_default()
    }

    /// The MIME type of the media content, or an empty string when missing.
    pub fn content_type(&self) -> &str {
        self.media
            .as_ref()
            .and_then(|e| e.content_type.as_deref())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.metadata()
            .and_then(|e| e.title.as_deref())
            .unwrap_or_default()
    }

    pub fn subtitle(&self) -> &str {
        self.metadata()
            .and_then(|e| e.subtitle.as_deref())
            .unwrap_or_default()
    }

    /// The url of the first artwork image, or an empty string when missing.
    pub fn artwork(&self) -> &str {
        self.metadata()
            .and_then(|e| e.images.as_ref())
            .and_then(|images| images.iter().flatten().next())
            .and_then(|e| e.url.as_deref())
            .unwrap_or_default()
    }

    /// The url of the subtitle track, or an empty string when missing.
    pub fn subtitles(&self) -> &str {
        self.media
            .as_ref()
            .and_then(|e| e.custom_data.as_ref())
            .and_then(|e| e.subtitles.as_deref())
            .unwrap_or_default()
    }

    /// Check if the media should start playing once loaded.
    /// It defaults to `true` when the sender didn't specify it.
    pub fn autoplay(&self) -> bool {
        self.autoplay.unwrap_or(true)
    }

    fn metadata(&self) -> Option<&MediaInfoMetadata> {
        self.media.as_ref().and_then(|e| e.metadata.as_ref())
    }
}

#[derive(Debug, Default)]
pub struct LoadRequestBuilder {
    content_id: Option<String>,
    content_type: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    artwork: Option<String>,
    subtitles: Option<String>,
    autoplay: Option<bool>,
}

impl LoadRequestBuilder {
    pub fn content_id<S: Into<String>>(mut self, content_id: S) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    pub fn content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle<S: Into<String>>(mut self, subtitle: S) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn artwork<S: Into<String>>(mut self, artwork: S) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    pub fn subtitles<S: Into<String>>(mut self, subtitles: S) -> Self {
        self.subtitles = Some(subtitles.into());
        self
    }

    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    pub fn build(self) -> LoadRequest {
        let metadata = MediaInfoMetadata {
            title: self.title,
            subtitle: self.subtitle,
            images: self
                .artwork
                .map(|url| vec![Some(MediaImage { url: Some(url) })]),
        };

        LoadRequest {
            media: Some(MediaInfo {
                content_id: self.content_id,
                content_type: self.content_type,
                metadata: Some(metadata),
                custom_data: Some(CustomData {
                    subtitles: self.subtitles,
                }),
            }),
            autoplay: self.autoplay,
        }
    }
}

/// The caption message received on the custom receiver namespace.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct CaptionMessage {
    /// The url of a new subtitle track to show.
    #[serde(default)]
    pub subtitles: Option<String>,
}

impl CaptionMessage {
    /// Parse the caption message from the given raw message payload.
    /// An invalid payload results in an empty message, which toggles the current captions.
    pub fn from_payload(payload: &str) -> Self {
        serde_json::from_str(payload).unwrap_or_default()
    }
}
