use super::{DisplayReview, Review, ReviewSource};
use crate::provider::ProviderReview;

struct Placeholder {
    id: &'static str,
    author: &'static str,
    rating: f32,
    content: &'static str,
    date: &'static str,
}

const PLACEHOLDERS: [Placeholder; 5] = [
    Placeholder {
        id: "placeholder_1",
        author: "María García",
        rating: 9.0,
        content: "Excellent and very well directed. The cast is great and the plot keeps you hooked from start to finish. I would definitely watch it again.",
        date: "3 days ago",
    },
    Placeholder {
        id: "placeholder_2",
        author: "Carlos López",
        rating: 8.0,
        content: "Very good. Beautiful cinematography and a perfect score. It could use a couple more action scenes, but it is easy to recommend.",
        date: "1 week ago",
    },
    Placeholder {
        id: "placeholder_3",
        author: "Ana Rodríguez",
        rating: 7.0,
        content: "Good, though not the best I have seen. The first half is slow but the second half improves a lot. Worth a watch.",
        date: "2 weeks ago",
    },
    Placeholder {
        id: "placeholder_4",
        author: "Juan Martínez",
        rating: 9.0,
        content: "A masterpiece. I did not expect it to be this good and the plot twists are impressive. Totally recommended.",
        date: "1 month ago",
    },
    Placeholder {
        id: "placeholder_5",
        author: "Sofía Chen",
        rating: 8.0,
        content: "Surprising. I expected a run-of-the-mill story but it is original and the characters are well developed.",
        date: "2 months ago",
    },
];

/// Number of placeholder reviews available for padding.
pub const PLACEHOLDER_POOL_SIZE: usize = PLACEHOLDERS.len();

/// Merge reviews for display.
///
/// User reviews come first (newest first), then provider reviews in
/// provider order. While the list is shorter than `floor`, placeholders are
/// appended in fixed pool order.
pub fn aggregate(
    user_reviews: Vec<Review>,
    provider_reviews: Vec<ProviderReview>,
    floor: usize,
) -> Vec<DisplayReview> {
    let mut user_reviews = user_reviews;
    user_reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let mut reviews: Vec<DisplayReview> = user_reviews
        .into_iter()
        .map(|r| DisplayReview {
            id: format!("user_{}", r.id),
            author: r.author,
            rating: Some(r.rating as f32),
            content: r.content,
            date: Some(r.created_at.date_naive().to_string()),
            source: ReviewSource::User,
            url: None,
        })
        .collect();

    reviews.extend(provider_reviews.into_iter().map(|r| DisplayReview {
        id: r.id,
        author: r.author,
        rating: r.rating,
        content: r.content,
        date: r
            .created_at
            .map(|d| d.get(..10).map(str::to_string).unwrap_or(d)),
        source: ReviewSource::Provider,
        url: r.url,
    }));

    let missing = floor.saturating_sub(reviews.len());
    reviews.extend(PLACEHOLDERS.iter().take(missing).map(|p| DisplayReview {
        id: p.id.to_string(),
        author: p.author.to_string(),
        rating: Some(p.rating),
        content: p.content.to_string(),
        date: Some(p.date.to_string()),
        source: ReviewSource::Placeholder,
        url: None,
    }));

    reviews
}
