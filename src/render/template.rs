//! Static page template for the annotated transcript.

const STYLE: &str = concat!(
    "span.ti { color: #aaa; padding-right: 10px; width: 150px; display: inline-block }\n",
    "span.ti:hover { color: #77f; padding-right: 10px }\n",
    "video#vplayr, audio#aplayr { width: 800px; padding: 10px }\n",
    "video::cue { color: #fff; background-color: rgba(0, 0, 0, 0.75) }\n",
    "video::cue(.unsure) { color: #444 }\n",
    "video::cue(.five) { color: #666 }\n",
    "video::cue(.six) { color: #888 }\n",
    "video::cue(.seven) { color: #aaa }\n",
    "video::cue(.eight) { color: #ddd }\n",
    "div#container { width: 100%; border: 1px solid #fff }\n",
    "div#transcript { width: 800px; height: 600px; overflow: auto; border-top: 1px solid #77f; ",
    "border-bottom: 1px solid #77f; margin: 6px; padding: 4px; float: left }\n",
    "div#nlp { width: 550px; height: 600px; overflow: auto; background-color: #fffabd; margin: 6px; padding: 4px }\n",
    "table#entities, table#metrics { padding: 2px; width: 100% }\n",
    "table#entities th, table#metrics th { border-top: 1px solid #bcba7d; border-bottom: 1px solid #bcba7d; text-align: left }\n",
    "table#entities thead, table#metrics thead, table#metrics tfoot { display: table; width: 98% }\n",
    "table#entities thead tr, table#metrics thead tr, table#metrics tfoot tr { display: block }\n",
    "table#entities tbody, table#metrics tbody { display: block; max-height: 560px; overflow-y: scroll; width: 98% }\n",
    "table#entities th:first-child, table#entities td:first-child, ",
    "table#metrics th:first-child, table#metrics td:first-child { width: 200px; word-break: break-word }\n",
    "table#entities th:nth-child(2), table#entities td:nth-child(2), ",
    "table#metrics th:nth-child(2), table#metrics td:nth-child(2) { width: 150px; word-break: break-word }\n",
    "table#entities th:nth-child(3), table#entities td:nth-child(3), ",
    "table#metrics th:nth-child(3), table#metrics td:nth-child(3) { width: 100px; word-break: break-word }\n",
    "table#entities th:nth-child(4), table#entities td:nth-child(4), ",
    "table#metrics th:nth-child(4), table#metrics td:nth-child(4) { padding-right: 20px; width: 80px; word-break: break-word }\n",
    "table#entities td.n, table#metrics td { text-align: right }\n",
    "table#metrics td:first-child { text-align: left }\n",
);

/// The media file the transcript belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub path: String,
    pub media_type: String,
}

impl MediaSource {
    pub fn new(path: &str, media_type: &str) -> Self {
        Self {
            path: path.to_string(),
            media_type: media_type.to_string(),
        }
    }

    pub fn is_video(&self) -> bool {
        self.media_type.starts_with("video/")
    }

    /// The path without its file extension.
    pub fn stem(&self) -> &str {
        let name_start = self.path.rfind('/').map_or(0, |i| i + 1);
        match self.path[name_start..].rfind('.') {
            Some(dot) if dot > 0 => &self.path[..name_start + dot],
            _ => &self.path,
        }
    }

    /// Caption file that sits next to the media for `language`.
    pub fn caption_path(&self, language: &str) -> String {
        format!("{}_{}.vtt", self.stem(), language)
    }
}

/// Display name for a caption track.
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "ja" => "Japanese",
        "zh" => "Chinese (Simplified)",
        "ar" => "Arabic",
        _ => code,
    }
}

/// Escapes text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Document head, stylesheet and the media player.
///
/// Video gets one subtitle track per language in `caption_languages`.
pub fn page_header(media: &MediaSource, caption_languages: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<html><head><meta charset=\"utf-8\"><style type=\"text/css\">\n{}</style></head><body>",
        STYLE
    ));

    let (element, id) = if media.is_video() {
        ("video", "vplayr")
    } else {
        ("audio", "aplayr")
    };
    out.push_str(&format!(
        "<{element} controls id=\"{id}\"><source src=\"{}\" type=\"{}\">",
        escape(&media.path),
        escape(&media.media_type)
    ));
    if media.is_video() {
        for language in caption_languages {
            out.push_str(&format!(
                "<track kind=\"subtitles\" label=\"{}\" srclang=\"{}\" src=\"{}\">",
                escape(language_name(language)),
                escape(language),
                escape(&media.caption_path(language))
            ));
        }
    }
    out.push_str(&format!(
        "This browser does not seem to support the {element} element.</{element}>"
    ));
    out.push_str(&format!(
        "<script>var mediaPlayerElem = document.getElementById('{id}');\
         function setTimeIndex(timeIndex) {{ mediaPlayerElem.currentTime = timeIndex; \
         if (mediaPlayerElem.paused) {{ mediaPlayerElem.play(); }} }}</script>"
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_extension_only_from_file_name() {
        assert_eq!(MediaSource::new("talk.mp4", "video/mp4").stem(), "talk");
        assert_eq!(MediaSource::new("media/v1.2/talk", "audio/mpeg").stem(), "media/v1.2/talk");
        assert_eq!(MediaSource::new(".hidden", "audio/mpeg").stem(), ".hidden");
        assert_eq!(
            MediaSource::new("media/talk.webm", "video/webm").caption_path("es"),
            "media/talk_es.vtt"
        );
    }

    #[test]
    fn video_header_has_tracks() {
        let media = MediaSource::new("talk.mp4", "video/mp4");
        let header = page_header(&media, &["en".to_string(), "es".to_string()]);
        assert!(header.contains("<video controls id=\"vplayr\">"));
        assert!(header.contains("<source src=\"talk.mp4\" type=\"video/mp4\">"));
        assert!(header.contains(
            "<track kind=\"subtitles\" label=\"English\" srclang=\"en\" src=\"talk_en.vtt\">"
        ));
        assert!(header.contains(
            "<track kind=\"subtitles\" label=\"Spanish\" srclang=\"es\" src=\"talk_es.vtt\">"
        ));
        assert!(header.contains("getElementById('vplayr')"));
    }

    #[test]
    fn audio_header_has_no_tracks() {
        let media = MediaSource::new("call.mp3", "audio/mpeg");
        let header = page_header(&media, &["en".to_string()]);
        assert!(header.contains("<audio controls id=\"aplayr\">"));
        assert!(!header.contains("<track"));
        assert!(header.contains("getElementById('aplayr')"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & \"c\">"), "a&lt;b &amp; &quot;c&quot;&gt;");
        assert_eq!(language_name("xx"), "xx");
    }
}
