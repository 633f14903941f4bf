use chrono::{DateTime, Utc};

use crate::prismic::Document;

/// Listing entry for a post.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    pub fn from_document(doc: &Document) -> Self {
        PostSummary {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: doc.data.title.clone(),
            subtitle: doc.data.subtitle.clone(),
            author: doc.data.author.clone(),
        }
    }
}

/// A fully loaded post page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub last_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub author: String,
    pub banner_url: String,
    pub content: Vec<Section>,
}

impl PostDetail {
    pub fn from_document(doc: &Document) -> Self {
        PostDetail {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            last_publication_date: doc.last_publication_date,
            title: doc.data.title.clone(),
            author: doc.data.author.clone(),
            banner_url: doc.data.banner.url.clone(),
            content: doc
                .data
                .content
                .iter()
                .map(|section| Section {
                    heading: section.heading.clone(),
                    body: section
                        .body
                        .iter()
                        .map(|paragraph| Paragraph {
                            text: paragraph.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// One titled block of post content. The heading may be empty; it is still
/// rendered, but contributes nothing to the word count.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub body: Vec<Paragraph>,
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    pub text: Option<String>,
}

/// A post whose last publication date equals its first was never edited;
/// drop the edited timestamp so display logic cannot show one.
pub fn normalize_edited_state(post: PostDetail) -> PostDetail {
    if post.last_publication_date == post.first_publication_date {
        PostDetail {
            last_publication_date: None,
            ..post
        }
    } else {
        post
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_with_dates(
        first: Option<DateTime<Utc>>,
        last: Option<DateTime<Utc>>,
    ) -> PostDetail {
        PostDetail {
            uid: "a".to_string(),
            first_publication_date: first,
            last_publication_date: last,
            title: String::new(),
            author: String::new(),
            banner_url: String::new(),
            content: Vec::new(),
        }
    }

    #[test]
    fn equal_publication_dates_mean_never_edited() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 10, 12, 0, 0).single();
        let normalized = normalize_edited_state(post_with_dates(ts, ts));
        assert!(normalized.last_publication_date.is_none());
    }

    #[test]
    fn differing_publication_dates_are_left_alone() {
        let first = Utc.with_ymd_and_hms(2021, 3, 10, 12, 0, 0).single();
        let last = Utc.with_ymd_and_hms(2021, 3, 16, 15, 49, 0).single();
        let normalized = normalize_edited_state(post_with_dates(first, last));
        assert_eq!(normalized.first_publication_date, first);
        assert_eq!(normalized.last_publication_date, last);
    }

    #[test]
    fn documents_with_missing_fields_still_convert() {
        let doc: Document = serde_json::from_str(
            r#"{
                "id": "X0",
                "uid": "sem-subtitulo",
                "first_publication_date": "2021-03-10T15:49:45+0000",
                "data": {
                    "title": "Só título",
                    "content": [
                        {"heading": "Intro", "body": [{"text": null}, {}]}
                    ]
                }
            }"#,
        )
        .unwrap();

        let summary = PostSummary::from_document(&doc);
        assert_eq!(summary.uid, "sem-subtitulo");
        assert_eq!(summary.subtitle, "");
        assert!(summary.first_publication_date.is_some());

        let detail = PostDetail::from_document(&doc);
        assert!(detail.last_publication_date.is_none());
        assert_eq!(detail.banner_url, "");
        assert_eq!(detail.content.len(), 1);
        assert!(detail.content[0].body.iter().all(|p| p.text.is_none()));
    }
}
