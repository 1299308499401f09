//! Paragraph batching and document translation
//!
//! Groups non-empty paragraphs into bounded-size batches, sends each batch
//! as one provider call, and distributes the translated lines back to
//! paragraph-level entries in original order. Planning is a pure pass over
//! the paragraph sequence so it can be tested without a live provider.

use async_trait::async_trait;
use tracing::debug;

use crate::core::errors::{Result, TranslationError};

/// Default per-batch character budget
pub const DEFAULT_MAX_CHARS: usize = 900;

/// A translation provider reachable through a single operation
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate a text block, preserving line breaks between its segments
    ///
    /// Language codes are passed through unchanged. The returned text is
    /// expected to contain one line per input line; callers must treat
    /// deviations as a data-integrity failure.
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
        -> Result<String>;
}

/// One unit of a batching plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Trimmed non-empty paragraph texts flushed as a single provider call
    Batch(Vec<String>),
    /// A whitespace-only paragraph, preserved as an empty output entry
    Blank,
}

/// Plan batches for a paragraph sequence in a single left-to-right pass.
///
/// The summed character count of a batch (separators excluded) never exceeds
/// `max_chars`, except when one paragraph is itself longer than the budget;
/// such a paragraph is planned alone, never split. A blank paragraph closes
/// the current batch, so blanks are never merged into one.
pub fn plan_batches(paragraphs: &[String], max_chars: usize) -> Vec<Segment> {
    let mut plan = Vec::new();
    let mut batch: Vec<String> = Vec::new();
    let mut batch_len = 0usize;

    for paragraph in paragraphs {
        let text = paragraph.trim();

        if text.is_empty() {
            if !batch.is_empty() {
                plan.push(Segment::Batch(std::mem::take(&mut batch)));
                batch_len = 0;
            }
            plan.push(Segment::Blank);
            continue;
        }

        let len = text.chars().count();
        if batch_len + len > max_chars && !batch.is_empty() {
            plan.push(Segment::Batch(std::mem::take(&mut batch)));
            batch_len = 0;
        }

        batch.push(text.to_string());
        batch_len += len;
    }

    if !batch.is_empty() {
        plan.push(Segment::Batch(batch));
    }

    plan
}

/// Translate an ordered paragraph sequence.
///
/// Returns one output entry per input paragraph, in original order, with
/// blank paragraphs mapped to empty strings. Batches are flushed strictly in
/// sequence; each provider call completes before the next paragraph is
/// considered. Provider failures propagate unmodified and no partial output
/// is returned.
pub async fn translate_document<T>(
    translator: &T,
    paragraphs: &[String],
    source_lang: &str,
    target_lang: &str,
    max_chars: usize,
) -> Result<Vec<String>>
where
    T: Translate + ?Sized,
{
    let mut output = Vec::with_capacity(paragraphs.len());

    for segment in plan_batches(paragraphs, max_chars) {
        match segment {
            Segment::Blank => output.push(String::new()),
            Segment::Batch(batch) => {
                let lines = flush(translator, &batch, source_lang, target_lang).await?;
                output.extend(lines);
            }
        }
    }

    Ok(output)
}

/// Send one batch and split the response back into per-paragraph lines.
///
/// An empty batch produces zero lines without a provider call. The line
/// count of the response must equal the batch's paragraph count; a deviation
/// fails the whole operation rather than silently misaligning paragraphs.
async fn flush<T>(
    translator: &T,
    batch: &[String],
    source_lang: &str,
    target_lang: &str,
) -> Result<Vec<String>>
where
    T: Translate + ?Sized,
{
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let text_block = batch.join("\n");
    debug!(
        paragraphs = batch.len(),
        chars = text_block.chars().count(),
        "Flushing batch"
    );

    let translated = translator
        .translate(&text_block, source_lang, target_lang)
        .await?;

    let lines: Vec<String> = translated
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();

    if lines.len() != batch.len() {
        return Err(TranslationError::AlignmentMismatch {
            expected: batch.len(),
            actual: lines.len(),
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Echoes every text block unchanged and records the calls it receives
    struct EchoTranslator {
        calls: Mutex<Vec<String>>,
    }

    impl EchoTranslator {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translate for EchoTranslator {
        async fn translate(&self, text: &str, _: &str, _: &str) -> Result<String> {
            self.calls.lock().unwrap().push(text.to_string());
            Ok(text.to_string())
        }
    }

    /// Always fails with a network error
    struct FailingTranslator;

    #[async_trait]
    impl Translate for FailingTranslator {
        async fn translate(&self, _: &str, _: &str, _: &str) -> Result<String> {
            Err(TranslationError::NetworkError {
                message: "connection reset".to_string(),
            })
        }
    }

    /// Returns only the first line of each block, violating the line contract
    struct DroppingTranslator;

    #[async_trait]
    impl Translate for DroppingTranslator {
        async fn translate(&self, text: &str, _: &str, _: &str) -> Result<String> {
            Ok(text.split('\n').next().unwrap_or_default().to_string())
        }
    }

    fn paras(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plan_empty_input() {
        assert!(plan_batches(&[], DEFAULT_MAX_CHARS).is_empty());
    }

    #[test]
    fn test_plan_groups_under_budget() {
        let plan = plan_batches(&paras(&["Hello", "World"]), DEFAULT_MAX_CHARS);
        assert_eq!(
            plan,
            vec![Segment::Batch(paras(&["Hello", "World"]))]
        );
    }

    #[test]
    fn test_plan_flushes_when_budget_exceeded() {
        let a = "A".repeat(500);
        let b = "B".repeat(500);
        let plan = plan_batches(&paras(&[&a, &b]), 900);
        assert_eq!(
            plan,
            vec![
                Segment::Batch(vec![a.clone()]),
                Segment::Batch(vec![b.clone()]),
            ]
        );
    }

    #[test]
    fn test_plan_exact_budget_fits_one_batch() {
        let a = "A".repeat(400);
        let b = "B".repeat(500);
        let plan = plan_batches(&paras(&[&a, &b]), 900);
        assert_eq!(plan, vec![Segment::Batch(vec![a, b])]);
    }

    #[test]
    fn test_plan_oversized_paragraph_goes_alone() {
        let big = "A".repeat(1000);
        let plan = plan_batches(&paras(&["short", &big, "tail"]), 900);
        assert_eq!(
            plan,
            vec![
                Segment::Batch(vec!["short".to_string()]),
                Segment::Batch(vec![big]),
                Segment::Batch(vec!["tail".to_string()]),
            ]
        );
    }

    #[test]
    fn test_plan_blank_closes_batch() {
        let plan = plan_batches(&paras(&["a", "  ", "b"]), 900);
        assert_eq!(
            plan,
            vec![
                Segment::Batch(vec!["a".to_string()]),
                Segment::Blank,
                Segment::Batch(vec!["b".to_string()]),
            ]
        );
    }

    #[test]
    fn test_plan_trimming_is_idempotent() {
        let raw = paras(&["  Hello  ", "\tWorld\n", "", "Again"]);
        let trimmed: Vec<String> = raw.iter().map(|p| p.trim().to_string()).collect();
        assert_eq!(
            plan_batches(&raw, 900),
            plan_batches(&trimmed, 900)
        );
    }

    #[test]
    fn test_plan_budget_counts_chars_not_bytes() {
        // Two-byte scalars; 500 of them fit a 900-char budget alongside
        // another 400 even though the byte count is far larger.
        let a = "é".repeat(500);
        let b = "è".repeat(400);
        let plan = plan_batches(&paras(&[&a, &b]), 900);
        assert_eq!(plan, vec![Segment::Batch(vec![a, b])]);
    }

    #[tokio::test]
    async fn test_translates_in_original_order() {
        let translator = EchoTranslator::new();
        let output = translate_document(
            &translator,
            &paras(&["Hello", "", "World"]),
            "en-IN",
            "hi-IN",
            900,
        )
        .await
        .unwrap();

        assert_eq!(output, paras(&["Hello", "", "World"]));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let translator = EchoTranslator::new();
        let output = translate_document(&translator, &[], "en-IN", "hi-IN", 900)
            .await
            .unwrap();

        assert!(output.is_empty());
        assert!(translator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_paragraphs_never_sent() {
        let translator = EchoTranslator::new();
        let output = translate_document(
            &translator,
            &paras(&["", "one", "  ", "two", ""]),
            "en-IN",
            "hi-IN",
            900,
        )
        .await
        .unwrap();

        assert_eq!(output, paras(&["", "one", "", "two", ""]));
        for call in translator.calls() {
            assert!(call.split('\n').all(|line| !line.trim().is_empty()));
        }
    }

    #[tokio::test]
    async fn test_batches_reconstruct_source_order() {
        let translator = EchoTranslator::new();
        let input = paras(&["alpha", "beta", "", "gamma", "delta"]);
        translate_document(&translator, &input, "en-IN", "hi-IN", 11)
            .await
            .unwrap();

        let sent: Vec<String> = translator
            .calls()
            .iter()
            .flat_map(|block| block.split('\n').map(|s| s.to_string()))
            .collect();
        assert_eq!(sent, paras(&["alpha", "beta", "gamma", "delta"]));
    }

    #[tokio::test]
    async fn test_oversized_paragraph_sent_alone() {
        let translator = EchoTranslator::new();
        let big = "A".repeat(1000);
        let output = translate_document(&translator, &paras(&[&big]), "en-IN", "hi-IN", 900)
            .await
            .unwrap();

        assert_eq!(output, vec![big]);
        assert_eq!(translator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_no_batch_exceeds_budget() {
        let translator = EchoTranslator::new();
        let input: Vec<String> = (0..40).map(|i| format!("paragraph number {i}")).collect();
        translate_document(&translator, &input, "en-IN", "hi-IN", 60)
            .await
            .unwrap();

        for call in translator.calls() {
            let total: usize = call.split('\n').map(|line| line.chars().count()).sum();
            assert!(total <= 60 || call.split('\n').count() == 1);
        }
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let result =
            translate_document(&FailingTranslator, &paras(&["Hello"]), "en-IN", "hi-IN", 900)
                .await;

        assert!(matches!(
            result,
            Err(TranslationError::NetworkError { .. })
        ));
    }

    #[tokio::test]
    async fn test_alignment_mismatch_is_detected() {
        let result = translate_document(
            &DroppingTranslator,
            &paras(&["one", "two"]),
            "en-IN",
            "hi-IN",
            900,
        )
        .await;

        assert!(matches!(
            result,
            Err(TranslationError::AlignmentMismatch {
                expected: 2,
                actual: 1,
            })
        ));
    }

    #[tokio::test]
    async fn test_crlf_line_breaks_are_accepted() {
        struct CrlfTranslator;

        #[async_trait]
        impl Translate for CrlfTranslator {
            async fn translate(&self, text: &str, _: &str, _: &str) -> Result<String> {
                Ok(text.replace('\n', "\r\n"))
            }
        }

        let output = translate_document(
            &CrlfTranslator,
            &paras(&["one", "two"]),
            "en-IN",
            "hi-IN",
            900,
        )
        .await
        .unwrap();

        assert_eq!(output, paras(&["one", "two"]));
    }
}
