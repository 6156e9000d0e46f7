//! Open Graph card templates.
//!
//! Cards are plain SVG documents built with `maud`. SVG has no line
//! breaking, so text is wrapped ahead of time using an average glyph
//! advance for the card font.

use maud::{Markup, PreEscaped, html};
use pwf_core::{
    config::OgConfig,
    og::{ImageKind, ImageRequest},
};

pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;

/// Average advance of a glyph, relative to the font size.
const AVG_ADVANCE: f32 = 0.6;
const LINE_SPACING: f32 = 1.25;
const MARGIN: f32 = 80.0;
/// Top of the footer line; text blocks above must end before it.
const FOOTER_Y: f32 = OG_HEIGHT as f32 - 90.0;
const CONTENT_WIDTH: f32 = OG_WIDTH as f32 - MARGIN * 2.0;
const ELLIPSIS: char = '…';

const INDIGO_950: &str = "#1e1b4b";
const INDIGO_700: &str = "#4338ca";
const INDIGO_600: &str = "#4f46e5";
const INDIGO_200: &str = "#c7d2fe";
const INDIGO_50: &str = "#eef2ff";
const GRAY_900: &str = "#111827";
const GRAY_600: &str = "#4b5563";

#[derive(Debug, Clone)]
pub struct OgOptions {
    pub font_family: String,
    pub font_weight: u16,
    pub debug: bool,
}

impl OgOptions {
    pub fn from_config(config: &OgConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            font_weight: config.font_weight,
            debug: config.debug,
        }
    }
}

impl Default for OgOptions {
    fn default() -> Self { Self::from_config(&OgConfig::default()) }
}

/// Build the card for a request: the prompt card for [`ImageKind::Prompt`],
/// the generic card otherwise.
pub fn select_layout(request: &ImageRequest, options: &OgOptions) -> String {
    let body = match request.kind {
        ImageKind::Prompt => prompt_card(request, options),
        ImageKind::Generic => generic_card(request, options),
    };
    document(body, options).into_string()
}

fn document(body: Markup, options: &OgOptions) -> Markup {
    html! {
        (PreEscaped("<?xml version=\"1.0\" encoding=\"utf-8\"?>"))
        svg xmlns="http://www.w3.org/2000/svg" version="1.1"
            viewBox=(format!("0 0 {OG_WIDTH} {OG_HEIGHT}")) width=(OG_WIDTH) height=(OG_HEIGHT)
            font-family=(options.font_family) font-weight=(options.font_weight) {
            (body)
        }
    }
}

fn generic_card(request: &ImageRequest, options: &OgOptions) -> Markup {
    let mut y = 150.0;
    let title = TextBlock::new(&request.title, 72.0, CONTENT_WIDTH, 3).at(MARGIN, y);
    y += title.height() + 24.0;
    let max_lines = lines_between(y, FOOTER_Y - 24.0, 34.0).min(3);
    let description =
        TextBlock::new(&request.description, 34.0, CONTENT_WIDTH, max_lines).at(MARGIN, y);
    html! {
        defs {
            linearGradient id="bg" x1="0" y1="0" x2="1" y2="1" {
                stop offset="0%" stop-color=(INDIGO_700) {}
                stop offset="100%" stop-color=(INDIGO_950) {}
            }
        }
        rect width=(OG_WIDTH) height=(OG_HEIGHT) fill="url(#bg)" {}
        rect x=(MARGIN) y="72" width="96" height="10" rx="5" fill=(INDIGO_200) {}
        (title.render("#ffffff", options))
        (description.render(INDIGO_200, options))
        (footer(request, "#ffffff", options))
    }
}

fn prompt_card(request: &ImageRequest, options: &OgOptions) -> Markup {
    let mut y = 150.0;
    let title = TextBlock::new(&request.title, 56.0, CONTENT_WIDTH, 2).at(MARGIN, y);
    y += title.height() + 16.0;
    let description = TextBlock::new(&request.description, 28.0, CONTENT_WIDTH, 2).at(MARGIN, y);
    y += description.height() + 28.0;
    let template = request.chat_template.as_deref().and_then(|text| {
        let padding = 24.0;
        let size = 24.0;
        let max_lines = lines_between(y + padding, FOOTER_Y - 20.0 - padding, size);
        let block = TextBlock::new(text, size, CONTENT_WIDTH - padding * 2.0, max_lines)
            .at(MARGIN + padding, y + padding);
        // Nothing to frame for blank templates
        (!block.lines.is_empty()).then(|| (y, block.height() + padding * 2.0, block))
    });
    html! {
        rect width=(OG_WIDTH) height=(OG_HEIGHT) fill="#ffffff" {}
        rect x="0" y="0" width="24" height=(OG_HEIGHT) fill=(INDIGO_600) {}
        rect x=(MARGIN) y="64" width="150" height="48" rx="24" fill=(INDIGO_50) {}
        text x=(MARGIN + 75.0) y="97" font-size="26" fill=(INDIGO_600) text-anchor="middle" {
            "Prompt"
        }
        (title.render(GRAY_900, options))
        (description.render(GRAY_600, options))
        @if let Some((top, height, block)) = &template {
            rect x=(MARGIN) y=(top) width=(CONTENT_WIDTH) height=(height) rx="16"
                fill=(INDIGO_50) stroke=(INDIGO_200) stroke-width="2" {}
            (block.render(INDIGO_950, options))
        }
        (footer(request, INDIGO_600, options))
    }
}

fn footer(request: &ImageRequest, fill: &str, options: &OgOptions) -> Markup {
    let host = request.origin_host();
    if host.is_empty() {
        return html! {};
    }
    TextBlock::new(host, 28.0, CONTENT_WIDTH, 1)
        .at(MARGIN, FOOTER_Y)
        .render(fill, options)
}

/// Number of lines at `size` that fit between `top` and `bottom`.
fn lines_between(top: f32, bottom: f32, size: f32) -> usize {
    ((bottom - top) / (size * LINE_SPACING)).floor().max(0.0) as usize
}

struct TextBlock {
    lines: Vec<String>,
    size: f32,
    width: f32,
    x: f32,
    y: f32,
}

impl TextBlock {
    fn new(text: &str, size: f32, width: f32, max_lines: usize) -> Self {
        Self { lines: wrap_text(text, size, width, max_lines), size, width, x: 0.0, y: 0.0 }
    }

    fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    fn line_height(&self) -> f32 { self.size * LINE_SPACING }

    fn height(&self) -> f32 { self.lines.len() as f32 * self.line_height() }

    fn render(&self, fill: &str, options: &OgOptions) -> Markup {
        // Baseline sits roughly 80% down the line box
        let ascent = self.line_height() * 0.8;
        html! {
            @if options.debug {
                rect x=(self.x) y=(self.y) width=(self.width) height=(self.height())
                    fill="none" stroke="#ff0000" stroke-width="1" {}
            }
            @for (i, line) in self.lines.iter().enumerate() {
                text x=(self.x) y=(self.y + ascent + i as f32 * self.line_height())
                    font-size=(self.size) fill=(fill) { (line) }
            }
        }
    }
}

/// Greedily wrap `text` into at most `max_lines` lines that fit `width`
/// at `font_size`. Explicit line breaks are kept, overlong words are split
/// and a truncated last line ends with an ellipsis.
pub fn wrap_text(text: &str, font_size: f32, width: f32, max_lines: usize) -> Vec<String> {
    let max_chars = ((width / (font_size * AVG_ADVANCE)).floor() as usize).max(1);
    let mut lines = Vec::<String>::new();
    'outer: for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            if lines.len() > max_lines {
                break 'outer;
            }
            let mut word: Vec<char> = word.chars().filter(|c| !c.is_control()).collect();
            if word.is_empty() {
                continue;
            }
            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            while word.len() > max_chars {
                if lines.len() > max_lines {
                    break 'outer;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }
        if current_len > 0 {
            lines.push(current);
        }
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut chars: Vec<char> = last.chars().collect();
            chars.truncate(max_chars.saturating_sub(1));
            while chars.last().is_some_and(|c| c.is_whitespace()) {
                chars.pop();
            }
            chars.push(ELLIPSIS);
            *last = chars.into_iter().collect();
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use pwf_core::{config::SiteConfig, og::ImageQuery};

    use super::*;

    fn request(raw: &str) -> ImageRequest {
        ImageRequest::from_query(
            ImageQuery::parse(Some(raw)),
            "https://prompts.example",
            &SiteConfig::default(),
        )
    }

    #[test]
    fn test_wrap_text() {
        // 600 / (20 * 0.6) = 50 characters per line
        let cases: &[(&str, usize, &[&str])] = &[
            ("", 3, &[]),
            ("Hello world", 3, &["Hello world"]),
            ("  spaced \t out  ", 3, &["spaced out"]),
            ("first\nsecond", 3, &["first", "second"]),
            ("one two", 0, &[]),
        ];
        for &(text, max_lines, expected) in cases {
            assert_eq!(wrap_text(text, 20.0, 600.0, max_lines), expected, "{text:?}");
        }
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text(&"a".repeat(120), 20.0, 600.0, 3);
        assert_eq!(lines, vec!["a".repeat(50), "a".repeat(50), "a".repeat(20)]);
    }

    #[test]
    fn test_wrap_text_long_word_stops_at_limit() {
        let lines = wrap_text(&"a".repeat(100_000), 20.0, 600.0, 2);
        assert_eq!(lines, vec!["a".repeat(50), format!("{}{ELLIPSIS}", "a".repeat(49))]);
    }

    #[test]
    fn test_wrap_text_breaks_between_words() {
        let text = format!("{} {}", "a".repeat(30), "b".repeat(30));
        assert_eq!(wrap_text(&text, 20.0, 600.0, 3), vec!["a".repeat(30), "b".repeat(30)]);
    }

    #[test]
    fn test_wrap_text_ellipsis() {
        let text = "word ".repeat(100);
        let lines = wrap_text(&text, 20.0, 600.0, 2);
        assert_eq!(lines.len(), 2);
        let last = &lines[1];
        assert!(last.ends_with(ELLIPSIS), "{last:?}");
        assert!(last.chars().count() <= 50);
        assert!(!last.trim_end_matches(ELLIPSIS).ends_with(' '));
    }

    #[test]
    fn test_wrap_text_strips_control_characters() {
        assert_eq!(wrap_text("bell\u{7}ring", 20.0, 600.0, 1), vec!["bellring"]);
    }

    #[test]
    fn test_select_generic() {
        let svg = select_layout(&request("title=Hello&description=World"), &OgOptions::default());
        assert!(svg.contains(r#"width="1200" height="630""#), "{svg}");
        assert!(svg.contains("Hello"));
        assert!(svg.contains("World"));
        assert!(svg.contains("prompts.example"));
        assert!(svg.contains(r#"font-family="Montserrat" font-weight="600""#));
        assert!(!svg.contains(">Prompt<"));
    }

    #[test]
    fn test_select_prompt() {
        let svg = select_layout(
            &request("kind=prompt&title=Poem&chatTemplate=Write+a+poem"),
            &OgOptions::default(),
        );
        assert!(svg.contains(">Prompt<"), "{svg}");
        assert!(svg.contains("Poem"));
        assert!(svg.contains("Write a poem"));
        // Site description fills in for the missing one
        assert!(svg.contains(pwf_core::config::DEFAULT_SITE_DESCRIPTION.split(' ').next().unwrap()));
    }

    #[test]
    fn test_unknown_kind_is_generic() {
        let options = OgOptions::default();
        assert_eq!(
            select_layout(&request("kind=other&title=T"), &options),
            select_layout(&request("title=T"), &options)
        );
    }

    #[test]
    fn test_escapes_markup() {
        let svg = select_layout(&request("title=%3Cscript%3E%26"), &OgOptions::default());
        assert!(svg.contains("&lt;script&gt;&amp;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn test_debug_outlines() {
        let options = OgOptions { debug: true, ..Default::default() };
        let svg = select_layout(&request("title=T"), &options);
        assert!(svg.contains(r##"stroke="#ff0000""##));
        let svg = select_layout(&request("title=T"), &OgOptions::default());
        assert!(!svg.contains(r##"stroke="#ff0000""##));
    }

    /// Vertical extents of the debug outlines, top to bottom.
    fn outlines(svg: &str) -> Vec<(f32, f32)> {
        let attr = |tag: &str, name: &str| -> f32 {
            let start = tag.find(&format!(" {name}=\"")).unwrap() + name.len() + 3;
            tag[start..].split('"').next().unwrap().parse().unwrap()
        };
        let mut boxes: Vec<(f32, f32)> = svg
            .split("<rect")
            .filter_map(|s| s.split('>').next())
            .filter(|tag| tag.contains(r##"stroke="#ff0000""##))
            .map(|tag| {
                let y = attr(tag, "y");
                (y, y + attr(tag, "height"))
            })
            .collect();
        boxes.sort_by(|a, b| a.0.total_cmp(&b.0));
        boxes
    }

    #[test]
    fn test_blocks_do_not_overlap_footer() {
        let options = OgOptions { debug: true, ..Default::default() };
        let long = "lorem ipsum dolor sit amet ".repeat(40);
        let cases = [
            format!("title={long}&description={long}"),
            format!("kind=prompt&title={long}&description={long}&chatTemplate={long}"),
        ];
        for query in &cases {
            let boxes = outlines(&select_layout(&request(query), &options));
            // Title, description, (template,) footer
            assert!(boxes.len() >= 3, "{boxes:?}");
            assert_eq!(boxes.last().unwrap().0, FOOTER_Y);
            for pair in boxes.windows(2) {
                assert!(pair[0].1 <= pair[1].0, "{query}: {boxes:?}");
            }
        }
    }

    #[test]
    fn test_lines_between() {
        assert_eq!(lines_between(0.0, 100.0, 20.0), 4);
        assert_eq!(lines_between(100.0, 0.0, 20.0), 0);
    }

    #[test]
    fn test_blank_template_has_no_frame() {
        let options = OgOptions::default();
        assert_eq!(
            select_layout(&request("kind=prompt&title=T&chatTemplate=+++"), &options),
            select_layout(&request("kind=prompt&title=T"), &options)
        );
    }
}
