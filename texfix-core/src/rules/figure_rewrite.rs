use super::engine::{compile_pattern, Rewrite, RewriteRule};
use crate::config::{FigureRewriteConfig, FIGURE_REWRITE};
use crate::error::Result;
use regex::Regex;

const CENTER_BEGIN: &str = r"\begin{center}";
const CENTER_END: &str = r"\end{center}";
const DRAWING_END: &str = r"\end{tikzpicture}";

// Opening half: center start, then the drawing up to its first end marker
const OPENING_PATTERN: &str =
    r"\\begin\{center\}\s*(\\begin\{tikzpicture\}[\s\S]*?\\end\{tikzpicture\})";
// Closing half, anchored right after the drawing: single-line caption, then center end
const CLOSING_PATTERN: &str = r"\A\s*\\captionof\{figure\}\{(.*?)\}\s*\\end\{center\}";

/// A `center` block that matched the full pattern, as byte ranges into the source
struct CenterBlock {
    start: usize,
    drawing: (usize, usize),
    caption: (usize, usize),
    end: usize,
}

// FigureRewriteRule - turns center + tikzpicture + captionof into a placed figure float
pub struct FigureRewriteRule {
    opening: Regex,
    closing: Regex,
    placement: String,
}

impl FigureRewriteRule {
    pub fn new(config: &FigureRewriteConfig) -> Result<Self> {
        Ok(Self {
            opening: compile_pattern(FIGURE_REWRITE, OPENING_PATTERN)?,
            closing: compile_pattern(FIGURE_REWRITE, CLOSING_PATTERN)?,
            placement: config.placement.clone(),
        })
    }

    /// Find the next complete block at or after `from`.
    ///
    /// Center blocks that don't fit the pattern are stepped over, so matching
    /// never spans from one `center` environment into the next.
    fn find_block(&self, text: &str, mut from: usize) -> Option<CenterBlock> {
        while let Some(caps) = self.opening.captures_at(text, from) {
            let whole = caps.get(0)?;
            let drawing = caps.get(1)?;

            if let Some(block) = self.close_block(text, whole.start(), drawing.start(), drawing.end())
            {
                return Some(block);
            }
            from = whole.start() + CENTER_BEGIN.len();
        }
        None
    }

    /// Extend the drawing over further end markers until a caption follows,
    /// staying inside the current center environment.
    fn close_block(
        &self,
        text: &str,
        start: usize,
        drawing_start: usize,
        mut drawing_end: usize,
    ) -> Option<CenterBlock> {
        loop {
            let rest = &text[drawing_end..];
            if let Some(caps) = self.closing.captures(rest) {
                let whole = caps.get(0)?;
                let caption = caps.get(1)?;
                return Some(CenterBlock {
                    start,
                    drawing: (drawing_start, drawing_end),
                    caption: (drawing_end + caption.start(), drawing_end + caption.end()),
                    end: drawing_end + whole.end(),
                });
            }

            let next = rest.find(DRAWING_END)?;
            let gap = &rest[..next];
            if gap.contains(CENTER_END) || gap.contains(CENTER_BEGIN) {
                return None;
            }
            drawing_end += next + DRAWING_END.len();
        }
    }

    fn render(&self, out: &mut String, drawing: &str, caption: &str) {
        out.push_str(r"\begin{figure}[");
        out.push_str(&self.placement);
        out.push_str("]\n");
        out.push_str(r"\centering");
        out.push('\n');
        out.push_str(drawing);
        out.push('\n');
        out.push_str(r"\caption{");
        out.push_str(caption);
        out.push_str("}\n");
        out.push_str(r"\end{figure}");
    }
}

impl RewriteRule for FigureRewriteRule {
    fn apply(&self, text: &str) -> Result<Rewrite> {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut substitutions = 0;

        while let Some(block) = self.find_block(text, copied) {
            out.push_str(&text[copied..block.start]);
            self.render(
                &mut out,
                &text[block.drawing.0..block.drawing.1],
                &text[block.caption.0..block.caption.1],
            );
            copied = block.end;
            substitutions += 1;
        }

        if substitutions == 0 {
            return Ok(Rewrite::unchanged(text));
        }
        out.push_str(&text[copied..]);
        Ok(Rewrite {
            text: out,
            substitutions,
        })
    }

    fn name(&self) -> &str {
        FIGURE_REWRITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> FigureRewriteRule {
        FigureRewriteRule::new(&FigureRewriteConfig::default()).unwrap()
    }

    const CAPTIONED: &str = "\\begin{center}\n\
        \\begin{tikzpicture} \\node (a) {A}; \\end{tikzpicture}\n\
        \\captionof{figure}{My Caption}\n\
        \\end{center}";

    const FIGURE: &str = "\\begin{figure}[H]\n\
        \\centering\n\
        \\begin{tikzpicture} \\node (a) {A}; \\end{tikzpicture}\n\
        \\caption{My Caption}\n\
        \\end{figure}";

    #[test]
    fn test_rewrites_captioned_center_block() {
        let result = rule().apply(CAPTIONED).unwrap();
        assert_eq!(result.text, FIGURE);
        assert_eq!(result.substitutions, 1);
    }

    #[test]
    fn test_surrounding_text_preserved() {
        let input = format!("Intro.\n\n{CAPTIONED}\n\nOutro.\n");
        let result = rule().apply(&input).unwrap();
        assert_eq!(result.text, format!("Intro.\n\n{FIGURE}\n\nOutro.\n"));
    }

    #[test]
    fn test_multiline_drawing_kept_verbatim() {
        let drawing = "\\begin{tikzpicture}[node distance=2cm]\n  \\node[entity] (student) {Student};\n  \\draw (student) -- (subject);\n\\end{tikzpicture}";
        let input = format!(
            "\\begin{{center}}\n{drawing}\n\\captionof{{figure}}{{ER diagram}}\n\\end{{center}}"
        );
        let result = rule().apply(&input).unwrap();
        assert!(result.text.contains(drawing));
        assert!(result.text.contains("\\caption{ER diagram}"));
        assert!(!result.text.contains("\\captionof"));
    }

    #[test]
    fn test_all_blocks_rewritten() {
        let input = format!("{CAPTIONED}\ntext\n{CAPTIONED}\nmore\n{CAPTIONED}\n");
        let result = rule().apply(&input).unwrap();
        assert_eq!(result.substitutions, 3);
        assert_eq!(result.text.matches("\\begin{figure}[H]").count(), 3);
        assert!(!result.text.contains("\\begin{center}"));
    }

    #[test]
    fn test_uncaptioned_block_passes_through() {
        let input = "\\begin{center}\n\\begin{tikzpicture} \\end{tikzpicture}\n\\end{center}\n";
        let result = rule().apply(input).unwrap();
        assert_eq!(result.text, input);
        assert_eq!(result.substitutions, 0);
    }

    #[test]
    fn test_uncaptioned_block_does_not_swallow_next_block() {
        let plain = "\\begin{center}\n\\begin{tikzpicture} \\node {P}; \\end{tikzpicture}\n\\end{center}\n";
        let input = format!("{plain}{CAPTIONED}");
        let result = rule().apply(&input).unwrap();
        assert_eq!(result.substitutions, 1);
        assert_eq!(result.text, format!("{plain}{FIGURE}"));
    }

    #[test]
    fn test_two_drawings_in_one_center_block() {
        let input = "\\begin{center}\n\\begin{tikzpicture} A \\end{tikzpicture}\n\\begin{tikzpicture} B \\end{tikzpicture}\n\\captionof{figure}{Pair}\n\\end{center}";
        let result = rule().apply(input).unwrap();
        assert_eq!(
            result.text,
            "\\begin{figure}[H]\n\\centering\n\\begin{tikzpicture} A \\end{tikzpicture}\n\\begin{tikzpicture} B \\end{tikzpicture}\n\\caption{Pair}\n\\end{figure}"
        );
    }

    #[test]
    fn test_caption_with_braces_and_dollar() {
        let input = "\\begin{center}\n\\begin{tikzpicture}\\end{tikzpicture}\n\\captionof{figure}{Cost in \\textbf{\\$} for $n$ items}\n\\end{center}";
        let result = rule().apply(input).unwrap();
        assert!(result
            .text
            .contains("\\caption{Cost in \\textbf{\\$} for $n$ items}\n\\end{figure}"));
    }

    #[test]
    fn test_non_figure_captionof_untouched() {
        let input = "\\begin{center}\n\\begin{tikzpicture}\\end{tikzpicture}\n\\captionof{table}{Grades}\n\\end{center}";
        assert_eq!(rule().apply(input).unwrap().text, input);
    }

    #[test]
    fn test_custom_placement() {
        let config = FigureRewriteConfig {
            placement: "htbp".to_string(),
        };
        let result = FigureRewriteRule::new(&config).unwrap().apply(CAPTIONED).unwrap();
        assert!(result.text.starts_with("\\begin{figure}[htbp]\n"));
    }

    #[test]
    fn test_non_ascii_caption_preserved() {
        let input = "Übersicht\n\\begin{center}\n\\begin{tikzpicture}\\node{é};\\end{tikzpicture}\n\\captionof{figure}{Schülerleistung – Überblick}\n\\end{center}";
        let result = rule().apply(input).unwrap();
        assert!(result.text.starts_with("Übersicht\n\\begin{figure}[H]"));
        assert!(result.text.contains("\\caption{Schülerleistung – Überblick}"));
    }
}
