use crate::format;
use crate::listing::ListingPage;
use crate::post::{PostDetail, PostSummary};

/// Container id the comment widget falls back to when a post has no uid.
const DEFAULT_COMMENTS_NODE_ID: &str = "comments";

/// Render the accumulated post listing as a Markdown document.
pub fn render_listing(listing: &ListingPage) -> String {
    let mut out = String::new();

    out.push_str("# spacetravelling.\n\n");

    for post in &listing.results {
        out.push_str(&format!("## [{}](/post/{})\n\n", post.title, post.uid));
        out.push_str(&format!("{}\n\n", post.subtitle));
        out.push_str(&format!(
            "{} · {}\n\n",
            format::format_display_date(post.first_publication_date, false),
            post.author
        ));
    }

    if listing.has_more() {
        out.push_str("Carregar mais posts\n");
    }

    out
}

/// Render one post page as a Markdown document.
pub fn render_post(
    post: &PostDetail,
    previous: Option<&PostSummary>,
    next: Option<&PostSummary>,
) -> String {
    let mut out = String::new();

    if !post.banner_url.is_empty() {
        out.push_str(&format!("![banner]({})\n\n", post.banner_url));
    }

    out.push_str(&format!("# {}\n\n", post.title));
    out.push_str(&format!(
        "{} · {} · {} min\n\n",
        format::format_display_date(post.first_publication_date, false),
        post.author,
        format::reading_time_minutes(&post.content)
    ));

    // Only an actually edited post still carries a last publication date
    // here; see normalize_edited_state.
    if post.last_publication_date.is_some() {
        out.push_str(&format!(
            "*editado em {}*\n\n",
            format::format_display_date(post.last_publication_date, true)
        ));
    }

    for section in &post.content {
        out.push_str(&format!("### {}\n\n", section.heading));
        for paragraph in &section.body {
            if let Some(text) = paragraph.text.as_deref() {
                out.push_str(text);
                out.push_str("\n\n");
            }
        }
    }

    if previous.is_some() || next.is_some() {
        out.push_str("---\n\n");
        if let Some(previous) = previous {
            out.push_str(&format!(
                "Post anterior: [{}](/post/{})\n\n",
                previous.title, previous.uid
            ));
        }
        if let Some(next) = next {
            out.push_str(&format!(
                "Próximo post: [{}](/post/{})\n\n",
                next.title, next.uid
            ));
        }
    }

    out.push_str(&comments_anchor(post));

    out
}

/// Page shown for a slug the content service does not know.
pub fn render_not_found(slug: &str) -> String {
    format!(
        "# Post não encontrado\n\nNenhum post com o identificador `{}`.\n",
        slug
    )
}

/// The widget script looks its container up by id, so each post supplies
/// its uid as a unique, stable identifier.
fn comments_anchor(post: &PostDetail) -> String {
    let node_id = if post.uid.is_empty() {
        DEFAULT_COMMENTS_NODE_ID
    } else {
        &post.uid
    };
    format!("<div id=\"{}\"></div>\n", node_id)
}
