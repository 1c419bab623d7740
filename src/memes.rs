use rand::Rng;

use crate::types::CommentRecord;

/// Celebration images, baked into the binary. Duplicate suppression keys on
/// these exact URLs, so editing an entry orphans comments posted with the
/// old one.
pub const MEME_CATALOG: [&str; 8] = [
    "https://media.giphy.com/media/g9582DNuQppxC/giphy.gif",
    "https://media.giphy.com/media/111ebonMs90YLu/giphy.gif",
    "https://media.giphy.com/media/l0MYt5jPR6QX5pnqM/giphy.gif",
    "https://media.giphy.com/media/nXxOjZrbnbRxS/giphy.gif",
    "https://media.giphy.com/media/a0h7sAqON67nO/giphy.gif",
    "https://media.giphy.com/media/mQG644PY8O7rG/giphy.gif",
    "https://media.giphy.com/media/4xpB3eE00FfBm/giphy.gif",
    "https://media.giphy.com/media/KYElw07kzDspaBOwf9/giphy.gif",
];

/// Picks a catalog entry uniformly at random. Back-to-back picks may repeat.
pub fn random_meme() -> &'static str {
    let index = rand::thread_rng().gen_range(0..MEME_CATALOG.len());
    MEME_CATALOG[index]
}

/// Renders the comment body for a meme URL.
pub fn meme_comment_body(url: &str) -> String {
    format!("![Meme]({url})")
}

/// Whether any existing comment already carries a catalog image. Matches on
/// raw substring containment, so a manually pasted catalog URL also counts
/// as celebrated.
pub fn already_celebrated(comments: &[CommentRecord]) -> bool {
    comments
        .iter()
        .any(|comment| MEME_CATALOG.iter().any(|url| comment.body.contains(url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(body: &str) -> CommentRecord {
        CommentRecord {
            body: body.to_string(),
        }
    }

    #[test]
    fn comment_body_wraps_the_url_in_image_markdown() {
        assert_eq!(
            meme_comment_body("https://example.com/party.gif"),
            "![Meme](https://example.com/party.gif)"
        );
    }

    #[test]
    fn random_meme_always_comes_from_the_catalog() {
        for _ in 0..64 {
            assert!(MEME_CATALOG.contains(&random_meme()));
        }
    }

    #[test]
    fn catalog_entries_are_distinct() {
        for (i, a) in MEME_CATALOG.iter().enumerate() {
            for b in &MEME_CATALOG[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn catalog_url_inside_a_longer_body_counts_as_celebrated() {
        let comments = vec![
            comment("unrelated discussion"),
            comment(&format!("nice! ![Meme]({}) :tada:", MEME_CATALOG[3])),
        ];
        assert!(already_celebrated(&comments));
    }

    #[test]
    fn unrelated_comments_do_not_count_as_celebrated() {
        let comments = vec![comment("LGTM"), comment("https://example.com/other.gif")];
        assert!(!already_celebrated(&comments));
    }

    #[test]
    fn no_comments_means_not_celebrated() {
        assert!(!already_celebrated(&[]));
    }
}
