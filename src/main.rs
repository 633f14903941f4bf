mod format;
mod listing;
mod output;
mod post;
mod prismic;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::listing::Paginator;

#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Command-line front-end for the spacetravelling blog, backed by a headless content API"
)]
struct Args {
    /// Content API endpoint (e.g. https://example.cdn.prismic.io/api/v2)
    #[arg(short, long)]
    api_url: String,

    /// Query a draft preview ref instead of the published master ref
    #[arg(long)]
    preview_ref: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List posts, following "load more" pagination
    List {
        /// Posts requested per page from the content service
        #[arg(short, long, default_value_t = 20)]
        page_size: u32,

        /// Listing pages to load before rendering
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render a single post page
    Post {
        /// Post uid
        slug: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Fetch every post and write the site as Markdown files
    Build {
        /// Output directory
        #[arg(short, long, default_value = "site")]
        out_dir: String,

        /// Posts requested per page from the content service
        #[arg(short, long, default_value_t = 20)]
        page_size: u32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let client = prismic::Client::new(&args.api_url, args.preview_ref.clone())
        .context("Failed to set up the content service client")?;

    if args.verbose {
        eprintln!("API endpoint: {}", args.api_url);
        eprintln!("Content ref: {}", client.reference());
    }

    match &args.command {
        Command::List {
            page_size,
            pages,
            output,
        } => cmd_list(&client, *page_size, *pages, output.as_deref(), args.verbose),
        Command::Post { slug, output } => cmd_post(&client, slug, output.as_deref(), args.verbose),
        Command::Build { out_dir, page_size } => {
            cmd_build(&client, *page_size, out_dir, args.verbose)
        }
    }
}

fn cmd_list(
    client: &prismic::Client,
    page_size: u32,
    pages: u32,
    output: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let mut paginator = Paginator::new(client, page_size);
    paginator
        .load_initial()
        .context("Failed to fetch the post listing")?;

    if verbose {
        eprintln!("Loaded {} posts", paginator.page().results.len());
    }

    for _ in 1..pages {
        if !paginator
            .request_more()
            .context("Failed to load more posts")?
        {
            break;
        }
        if verbose {
            eprintln!("Loaded {} posts", paginator.page().results.len());
        }
    }

    write_output(&output::render_listing(paginator.page()), output)
}

fn cmd_post(
    client: &prismic::Client,
    slug: &str,
    output: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let Some(doc) = client.get_by_uid(slug).context("Failed to fetch post")? else {
        // An unknown slug renders the not-found page rather than failing.
        return write_output(&output::render_not_found(slug), output);
    };

    if verbose {
        eprintln!("Found post {} (document {})", slug, doc.id);
    }

    let (previous, next) = client
        .neighbors(&doc.id)
        .context("Failed to fetch neighboring posts")?;

    let detail = post::normalize_edited_state(post::PostDetail::from_document(&doc));
    let previous = previous.as_ref().map(post::PostSummary::from_document);
    let next = next.as_ref().map(post::PostSummary::from_document);

    write_output(
        &output::render_post(&detail, previous.as_ref(), next.as_ref()),
        output,
    )
}

fn cmd_build(client: &prismic::Client, page_size: u32, out_dir: &str, verbose: bool) -> Result<()> {
    let mut paginator = Paginator::new(client, page_size);
    paginator
        .load_initial()
        .context("Failed to fetch the post listing")?;

    while paginator
        .request_more()
        .context("Failed to load more posts")?
    {
        if verbose {
            eprintln!("Loaded {} posts", paginator.page().results.len());
        }
    }

    let listing = paginator.page();

    let posts_dir = std::path::Path::new(out_dir).join("post");
    std::fs::create_dir_all(&posts_dir)
        .with_context(|| format!("Failed to create output directory {:?}", posts_dir))?;

    let index_path = std::path::Path::new(out_dir).join("index.md");
    std::fs::write(&index_path, output::render_listing(listing))
        .with_context(|| format!("Failed to write {:?}", index_path))?;

    let total = listing.results.len();
    for (i, summary) in listing.results.iter().enumerate() {
        if summary.uid.is_empty() {
            eprintln!("[{}/{}] Skipping post without a uid", i + 1, total);
            continue;
        }

        if verbose {
            eprintln!("[{}/{}] Rendering post {}...", i + 1, total, summary.uid);
        }

        let Some(doc) = client
            .get_by_uid(&summary.uid)
            .with_context(|| format!("Failed to fetch post {}", summary.uid))?
        else {
            eprintln!(
                "[{}/{}] Post {} vanished from the listing, skipping",
                i + 1,
                total,
                summary.uid
            );
            continue;
        };

        let (previous, next) = client
            .neighbors(&doc.id)
            .with_context(|| format!("Failed to fetch neighbors of {}", summary.uid))?;

        let detail = post::normalize_edited_state(post::PostDetail::from_document(&doc));
        let previous = previous.as_ref().map(post::PostSummary::from_document);
        let next = next.as_ref().map(post::PostSummary::from_document);

        let path = posts_dir.join(format!("{}.md", summary.uid));
        std::fs::write(
            &path,
            output::render_post(&detail, previous.as_ref(), next.as_ref()),
        )
        .with_context(|| format!("Failed to write {:?}", path))?;

        // Small delay to be respectful to the server
        std::thread::sleep(std::time::Duration::from_millis(200));
    }

    eprintln!("Site written to {}", out_dir);

    Ok(())
}

fn write_output(rendered: &str, output: Option<&str>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write output to {}", path))?;
        eprintln!("Output written to {}", path);
    } else {
        print!("{}", rendered);
    }
    Ok(())
}
