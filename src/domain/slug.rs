//! Deterministic, human-friendly slug derivation for post titles.
//!
//! ASCII slugification (`slug` crate) is bridged with Chinese transliteration
//! (`pinyin` crate) so a title like “周末随笔” becomes `zhou-mo-sui-bi`.
//! Collision handling is driven by an async uniqueness predicate supplied by
//! the caller, keeping derivation itself pure.

use std::future::Future;

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Errors from [`generate_unique_slug`], wrapping predicate failures.
#[derive(Debug, Error)]
pub enum SlugLookupError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error(transparent)]
    Predicate(E),
}

/// Derive the base slug for a post title.
pub fn derive_slug(title: &str) -> Result<String, SlugError> {
    if title.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(transliterate_to_ascii(title));
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: title.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug that is unique according to `is_free`. The predicate
/// returns `true` when the candidate is not yet taken; collisions retry with
/// a monotonic suffix (`-2`, `-3`, …).
pub async fn generate_unique_slug<F, Fut, E>(
    title: &str,
    mut is_free: F,
) -> Result<String, SlugLookupError<E>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let base = derive_slug(title)?;

    if is_free(base.clone())
        .await
        .map_err(SlugLookupError::Predicate)?
    {
        return Ok(base);
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_free(candidate.clone())
            .await
            .map_err(SlugLookupError::Predicate)?
        {
            return Ok(candidate);
        }
    }

    Err(SlugLookupError::Slug(SlugError::Exhausted { base }))
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_lowercases_and_hyphenates() {
        assert_eq!(derive_slug("Hello World").expect("slug"), "hello-world");
    }

    #[test]
    fn derive_slug_transliterates_chinese() {
        assert_eq!(
            derive_slug("Rust 周末随笔").expect("slug"),
            "rust-zhou-mo-sui-bi"
        );
    }

    #[test]
    fn derive_slug_rejects_blank_titles() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[tokio::test]
    async fn generate_unique_slug_appends_counter() {
        let taken = ["hello-world".to_string(), "hello-world-2".to_string()];
        let slug = generate_unique_slug("Hello World", |candidate| {
            let free = !taken.contains(&candidate);
            async move { Ok::<bool, std::convert::Infallible>(free) }
        })
        .await
        .expect("unique slug");

        assert_eq!(slug, "hello-world-3");
    }

    #[tokio::test]
    async fn generate_unique_slug_gives_up_eventually() {
        let result = generate_unique_slug("Hello", |_| async {
            Ok::<bool, std::convert::Infallible>(false)
        })
        .await;

        assert!(matches!(
            result,
            Err(SlugLookupError::Slug(SlugError::Exhausted { .. }))
        ));
    }
}
