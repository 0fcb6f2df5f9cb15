//! Quality scoring and featured/other selection.
//!
//! Score (0-100):
//! - up to 50 points for length, saturating at 2000 words
//! - up to 50 points for engagement, 5 per comment, saturating at 10 comments

use crate::models::Article;

const WORDS_FOR_FULL_LENGTH_SCORE: f64 = 2000.0;
const LENGTH_POINTS: f64 = 50.0;
const POINTS_PER_COMMENT: f64 = 5.0;
const COMMENT_POINTS: f64 = 50.0;

/// Default number of featured articles per digest.
pub const DEFAULT_FEATURED_COUNT: usize = 7;

pub fn quality_score(word_count: usize, comments: u32) -> f64 {
    let length_score = (word_count as f64 / WORDS_FOR_FULL_LENGTH_SCORE).min(1.0) * LENGTH_POINTS;
    let comment_score = if comments > 0 {
        (comments as f64 * POINTS_PER_COMMENT).min(COMMENT_POINTS)
    } else {
        0.0
    };
    round2(length_score + comment_score)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Score every article, sort by descending score (stable), and split into
/// the top `count` and the rest.
pub fn select_top(mut articles: Vec<Article>, count: usize) -> (Vec<Article>, Vec<Article>) {
    for article in &mut articles {
        article.quality_score = quality_score(article.word_count, article.comments);
    }
    articles.sort_by(|a, b| b.quality_score.total_cmp(&a.quality_score));

    let others = articles.split_off(count.min(articles.len()));
    (articles, others)
}
