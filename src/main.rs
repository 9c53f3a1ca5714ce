//! bookwalk - print the outline of a book from its render context

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use clap::Parser;
use log::info;

use bookwalk::markdown::{MarkdownParser, NodeKind, ParserOptions, WalkStatus, visitor_fn};
use bookwalk::{Chapter, ChapterContent, Error, Handler, Processor, RenderContext};

#[derive(Parser)]
#[command(name = "bookwalk")]
#[command(version, about = "Print the outline of a book from its render context", long_about = None)]
#[command(after_help = "EXAMPLES:
    bookwalk context.json          Print the outline
    bookwalk --words < ctx.json    Read stdin, include word counts
    bookwalk --strict ctx.json     Fail on chapters whose source file is empty
    RUST_LOG=debug bookwalk ctx.json")]
struct Cli {
    /// Render context JSON file (reads stdin when omitted or \"-\")
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Parse each chapter and show its word count
    #[arg(short, long)]
    words: bool,

    /// Only print the summary line
    #[arg(short, long)]
    quiet: bool,

    /// Fail on a chapter that has a source file but no content
    #[arg(short, long)]
    strict: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> bookwalk::Result<()> {
    let ctx = match cli.input.as_deref() {
        None | Some("-") => RenderContext::from_json(io::stdin().lock())?,
        Some(path) => {
            info!("reading render context from {path}");
            RenderContext::from_json(BufReader::new(File::open(path)?))?
        }
    };

    write_outline(&ctx, cli, io::stdout().lock())
}

/// Print the outline of `ctx` followed by a summary line.
///
/// Markdown extensions come from the `output.bookwalk` table when present.
fn write_outline<W: Write>(ctx: &RenderContext, cli: &Cli, out: W) -> bookwalk::Result<()> {
    let options: ParserOptions = ctx
        .config
        .get_deserialized_opt("output.bookwalk")?
        .unwrap_or_default();
    let processor = Processor::with_parser(ctx, MarkdownParser::new(options));

    let mut outline = Outline::new(out, cli);
    processor.process(&mut outline)?;

    let title = ctx.config.book.as_ref().and_then(|b| b.title.as_deref());
    outline.summary(title)
}

/// Prints one line per book item, indented by nesting depth.
struct Outline<W> {
    out: W,
    words: bool,
    quiet: bool,
    strict: bool,
    chapters: usize,
    total_words: usize,
}

impl<W: Write> Outline<W> {
    fn new(out: W, cli: &Cli) -> Self {
        Self {
            out,
            words: cli.words,
            quiet: cli.quiet,
            strict: cli.strict,
            chapters: 0,
            total_words: 0,
        }
    }

    fn summary(&mut self, title: Option<&str>) -> bookwalk::Result<()> {
        if let Some(title) = title {
            write!(self.out, "{title}: ")?;
        }
        write!(self.out, "{} chapters", self.chapters)?;
        if self.words {
            write!(self.out, ", {} words", self.total_words)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> Handler for Outline<W> {
    type Error = bookwalk::Error;

    fn on_chapter(&mut self, chapter: &Chapter, content: ChapterContent<'_>) -> bookwalk::Result<()> {
        self.chapters += 1;

        if self.strict
            && chapter.content.trim().is_empty()
            && let Some(path) = &chapter.path
        {
            return Err(Error::processing(format!(
                "chapter `{}` ({}) has no content",
                chapter.name,
                path.display()
            )));
        }

        let words = if self.words {
            let mut count = 0;
            content.walk(&mut visitor_fn(|node, entering| {
                if let (true, NodeKind::Text(text)) = (entering, &node.kind) {
                    count += text.split_whitespace().count();
                }
                Ok::<_, bookwalk::Error>(WalkStatus::Continue)
            }))?;
            self.total_words += count;
            Some(count)
        } else {
            None
        };

        if self.quiet {
            return Ok(());
        }

        let indent = "  ".repeat(chapter.parent_names.len());
        write!(self.out, "{indent}")?;
        if let Some(number) = &chapter.number {
            write!(self.out, "{number} ")?;
        }
        write!(self.out, "{}", chapter.name)?;
        if chapter.is_draft_chapter() {
            write!(self.out, " (draft)")?;
        }
        if let Some(count) = words {
            write!(self.out, " [{count} words]")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn on_separator(&mut self) -> bookwalk::Result<()> {
        if !self.quiet {
            writeln!(self.out, "---")?;
        }
        Ok(())
    }

    fn on_part_title(&mut self, title: &str) -> bookwalk::Result<()> {
        if !self.quiet {
            writeln!(self.out, "# {title}")?;
        }
        Ok(())
    }
}
