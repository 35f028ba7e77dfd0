//! Builds the annotated entry body and detects earlier annotations.
//!
//! Every block carries an HTML `id` attribute derived from the entry id. The
//! quoted attribute value doubles as the idempotence marker, so `summary-1`
//! never matches inside `summary-12`.

use crate::models::Annotation;

const SUMMARY_LABEL: &str = "摘要：";
const TRANSLATION_LABEL: &str = "翻译：";
const ORIGINAL_LABEL: &str = "原文开始：";

pub fn summary_marker(entry_id: i64) -> String {
    format!("id='summary-{}'", entry_id)
}

pub fn translation_marker(entry_id: i64) -> String {
    format!("id='translation-{}'", entry_id)
}

/// True when `content` already holds both annotation blocks for `entry_id`.
///
/// Plain substring containment: article text that happens to include the
/// marker will be treated as annotated.
pub fn is_already_annotated(content: &str, entry_id: i64) -> bool {
    content.contains(&summary_marker(entry_id)) && content.contains(&translation_marker(entry_id))
}

pub fn summary_block(entry_id: i64, summary: &str) -> String {
    format!(
        "\n<div {} style='border: 1px solid #ccc; padding: 10px; margin-bottom: 10px; background-color: #f9f9f9;'>\n    <strong>{}</strong>\n    <p>{}</p>\n</div>\n",
        summary_marker(entry_id),
        SUMMARY_LABEL,
        summary
    )
}

pub fn translation_block(entry_id: i64, translation: &str) -> String {
    format!(
        "\n<div {} style='border: 1px solid #ccc; padding: 10px; margin-bottom: 10px; background-color: #eef9f9;'>\n    <strong>{}</strong>\n    <p>{}</p>\n</div>\n",
        translation_marker(entry_id),
        TRANSLATION_LABEL,
        translation
    )
}

pub fn original_marker(entry_id: i64) -> String {
    format!(
        "<div id='original-{}'><strong>{}</strong></div>",
        entry_id, ORIGINAL_LABEL
    )
}

/// Summary block, translation block, original marker, then `content` verbatim.
///
/// Callers check [`is_already_annotated`] first; composing over an annotated
/// body would stack a second pair of blocks.
pub fn compose(content: &str, entry_id: i64, annotation: &Annotation) -> String {
    let summary = summary_block(entry_id, &annotation.summary);
    let translation = translation_block(entry_id, &annotation.translation);
    let marker = original_marker(entry_id);

    let mut out =
        String::with_capacity(summary.len() + translation.len() + marker.len() + content.len());
    out.push_str(&summary);
    out.push_str(&translation);
    out.push_str(&marker);
    out.push_str(content);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation() -> Annotation {
        Annotation {
            summary: "Summary".to_string(),
            translation: "翻译".to_string(),
        }
    }

    #[test]
    fn plain_content_is_not_annotated() {
        assert!(!is_already_annotated("<p>Body</p>", 1));
    }

    #[test]
    fn composed_content_is_annotated() {
        let content = compose("<p>Body</p>", 7, &annotation());
        assert!(is_already_annotated(&content, 7));
    }

    #[test]
    fn one_marker_alone_is_not_enough() {
        let content = format!("{}<p>Body</p>", summary_block(3, "s"));
        assert!(!is_already_annotated(&content, 3));

        let content = format!("{}<p>Body</p>", translation_block(3, "t"));
        assert!(!is_already_annotated(&content, 3));
    }

    #[test]
    fn markers_of_other_entries_do_not_match() {
        let content = compose("Body", 1, &annotation());
        assert!(!is_already_annotated(&content, 2));
        assert!(!is_already_annotated(&content, 11));

        let content = compose("Body", 12, &annotation());
        assert!(!is_already_annotated(&content, 1));
        assert!(!is_already_annotated(&content, 2));
        assert!(!content.contains(&summary_marker(1)));
    }

    #[test]
    fn blocks_appear_in_order_before_verbatim_original() {
        let original = "<article><h1>Title</h1><p>Long body with 'quotes' and 中文</p></article>";
        let content = compose(original, 5, &annotation());

        let summary_at = content.find(&summary_marker(5)).unwrap();
        let translation_at = content.find(&translation_marker(5)).unwrap();
        let original_at = content.find(&original_marker(5)).unwrap();

        assert!(summary_at < translation_at);
        assert!(translation_at < original_at);
        assert!(content.ends_with(original));
        assert_eq!(
            &content[original_at + original_marker(5).len()..],
            original
        );
    }

    #[test]
    fn compose_is_exact_concatenation() {
        let content = compose("Body", 1, &annotation());
        let expected = summary_block(1, "Summary") + &translation_block(1, "翻译") + &original_marker(1) + "Body";
        assert_eq!(content, expected);
    }

    #[test]
    fn blocks_embed_generated_text() {
        let block = summary_block(1, "Short summary");
        assert!(block.contains("<p>Short summary</p>"));
        assert!(block.contains(SUMMARY_LABEL));

        let block = translation_block(1, "完整翻译");
        assert!(block.contains("<p>完整翻译</p>"));
        assert!(block.contains(TRANSLATION_LABEL));
    }
}
