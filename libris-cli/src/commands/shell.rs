//! Shell command implementation
//!
//! Reads one command per line and applies it to a catalog that lives for
//! the duration of the process.

use anyhow::{anyhow, bail, Context, Result};
use libris_core::{
    export_book, rank, search, Book, BookDraft, BookId, CatalogError, CatalogStore, Field, Limits,
    LocalTextStorage, RankingQuery, TextStorage,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  add key=value...          add a book (keys: name author genre year rating review text file)
  edit REF key=value...     change fields of a book
  start REF                 start reading a book
  finish REF                finish reading a book
  show REF                  show one book
  list                      list every book
  search [TERM]             search name, author and genre
  top [N]                   most read books
  top-genre TERM [N]        most read books of a genre
  top-author TERM [N]       most read books of an author
  export REF                save a book's text as <name>.txt
  help                      show this help
  quit, exit                leave the session
REF is a book id, a unique id prefix or #N for the N-th listed book.";

/// Whether the session should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run an interactive session on stdin/stdout
pub async fn shell(files_dir: PathBuf, limits: Limits) -> Result<()> {
    tracing::debug!("Session files directory: {}", files_dir.display());
    let mut session = Session::new(Arc::new(LocalTextStorage::new(files_dir)), limits);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read command")?
    {
        let flow = session.execute(&line, &mut out).await?;
        out.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }

    tracing::info!("Session ended with {} book(s)", session.catalog.len());
    Ok(())
}

/// A catalog plus the collaborators a session needs
pub struct Session {
    catalog: CatalogStore,
    storage: Arc<dyn TextStorage>,
    limits: Limits,
}

impl Session {
    pub fn new(storage: Arc<dyn TextStorage>, limits: Limits) -> Self {
        Self {
            catalog: CatalogStore::new(),
            storage,
            limits,
        }
    }

    /// Execute one command line.
    ///
    /// Command failures are reported on `out` and never end the session;
    /// only a failing writer is returned as an error.
    pub async fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let args = match shell_words::split(line) {
            Ok(args) => args,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match self.dispatch(&args, out).await {
            Ok(flow) => Ok(flow),
            Err(e) => {
                match e.downcast_ref::<CatalogError>() {
                    Some(CatalogError::Validation(errors)) => {
                        for (field, message) in errors.iter() {
                            writeln!(out, "error: {}: {}", field, message)?;
                        }
                    }
                    _ => writeln!(out, "error: {}", e)?,
                }
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(&mut self, args: &[String], out: &mut impl Write) -> Result<Flow> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.as_str() {
            "add" => self.add(rest, out).await?,
            "edit" => self.edit(rest, out).await?,
            "start" => {
                let id = self.resolve(one_ref(rest)?)?;
                self.catalog.start_reading(id)?;
                writeln!(out, "reading {}", self.book(id)?.name)?;
            }
            "finish" => {
                let id = self.resolve(one_ref(rest)?)?;
                self.catalog.finish_reading(id)?;
                let book = self.book(id)?;
                writeln!(out, "finished {} (read {} times)", book.name, book.read_count())?;
            }
            "show" => {
                let id = self.resolve(one_ref(rest)?)?;
                self.show(id, out)?;
            }
            "list" => {
                let books = self.catalog.snapshot();
                let all: Vec<&Book> = books.iter().collect();
                self.print_rows(&all, out)?;
            }
            "search" => {
                let books = self.catalog.snapshot();
                let found = search(&books, &rest.join(" "));
                self.print_rows(&found, out)?;
            }
            "top" => {
                let limits = Limits {
                    top_overall: limit_arg(rest.first(), self.limits.top_overall)?,
                    ..self.limits
                };
                self.print_ranking(&RankingQuery::Overall, &limits, out)?;
            }
            "top-genre" => {
                let (term, n) = term_and_limit(rest, self.limits.top_by_genre)?;
                let limits = Limits {
                    top_by_genre: n,
                    ..self.limits
                };
                self.print_ranking(&RankingQuery::Genre(term), &limits, out)?;
            }
            "top-author" => {
                let (term, n) = term_and_limit(rest, self.limits.top_by_author)?;
                let limits = Limits {
                    top_by_author: n,
                    ..self.limits
                };
                self.print_ranking(&RankingQuery::Author(term), &limits, out)?;
            }
            "export" => {
                let id = self.resolve(one_ref(rest)?)?;
                let location = export_book(self.storage.as_ref(), &self.catalog, id).await?;
                writeln!(out, "exported to {}", location)?;
            }
            "help" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => bail!("unknown command '{}', try 'help'", other),
        }

        Ok(Flow::Continue)
    }

    async fn add(&mut self, rest: &[String], out: &mut impl Write) -> Result<()> {
        let mut draft = BookDraft::default();
        self.fill(&mut draft, rest, out).await?;

        let id = self.catalog.add(&draft)?;
        writeln!(out, "added {}", id)?;
        Ok(())
    }

    async fn edit(&mut self, rest: &[String], out: &mut impl Write) -> Result<()> {
        let (reference, assignments) = rest
            .split_first()
            .ok_or_else(|| anyhow!("missing book reference"))?;
        let id = self.resolve(reference)?;

        let mut draft = BookDraft::from(self.book(id)?);
        self.fill(&mut draft, assignments, out).await?;

        self.catalog.save(id, &draft)?;
        writeln!(out, "saved {}", id)?;
        Ok(())
    }

    /// Apply `key=value` assignments to a draft, importing `file=` through
    /// the text storage
    async fn fill(
        &self,
        draft: &mut BookDraft,
        assignments: &[String],
        out: &mut impl Write,
    ) -> Result<()> {
        for assignment in assignments {
            let (key, value) = assignment
                .split_once('=')
                .ok_or_else(|| anyhow!("expected key=value, got '{}'", assignment))?;

            if key == "file" {
                let outcome = self.storage.import(value).await;
                if let Err(e) = &outcome {
                    writeln!(out, "warning: {}", e)?;
                }
                draft.apply_import(outcome);
            } else {
                let field: Field = key.parse()?;
                draft.set(field, value);
            }
        }
        Ok(())
    }

    /// Resolve `#N`, a full id or a unique id prefix to a book id
    fn resolve(&self, reference: &str) -> Result<BookId> {
        if reference.trim().is_empty() {
            bail!("missing book reference");
        }

        if let Some(position) = reference.strip_prefix('#') {
            let n: usize = position
                .parse()
                .with_context(|| format!("invalid position '{}'", reference))?;
            return n
                .checked_sub(1)
                .and_then(|i| self.catalog.ids().nth(i))
                .ok_or_else(|| anyhow!("no book at position {}", n));
        }

        if let Ok(id) = reference.parse::<BookId>() {
            return Ok(id);
        }

        let prefix = reference.to_lowercase();
        let mut matches = self
            .catalog
            .ids()
            .filter(|id| id.to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => bail!("'{}' matches more than one book", reference),
            (None, _) => bail!("no book matches '{}'", reference),
        }
    }

    fn book(&self, id: BookId) -> Result<&Book> {
        self.catalog
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id).into())
    }

    fn position(&self, id: BookId) -> usize {
        self.catalog
            .ids()
            .position(|other| other == id)
            .map_or(0, |i| i + 1)
    }

    fn show(&self, id: BookId, out: &mut impl Write) -> Result<()> {
        let book = self.book(id)?;
        writeln!(out, "id:      {}", book.id())?;
        writeln!(out, "name:    {}", book.name)?;
        writeln!(out, "author:  {}", book.author)?;
        writeln!(out, "genre:   {}", book.genre)?;
        writeln!(out, "year:    {}", book.year)?;
        if let Some(rating) = book.rating {
            writeln!(out, "rating:  {}", rating)?;
        }
        if let Some(review) = &book.review {
            writeln!(out, "review:  {}", review)?;
        }
        writeln!(out, "reads:   {}", book.read_count())?;
        writeln!(out, "session: {}", book.session())?;
        writeln!(out, "text:    {} characters", book.text.chars().count())?;
        Ok(())
    }

    fn print_ranking(
        &self,
        query: &RankingQuery,
        limits: &Limits,
        out: &mut impl Write,
    ) -> Result<()> {
        let books = self.catalog.snapshot();
        let ranked = rank(&books, query, limits);
        self.print_rows(&ranked, out)
    }

    fn print_rows(&self, books: &[&Book], out: &mut impl Write) -> Result<()> {
        if books.is_empty() {
            writeln!(out, "no books")?;
        }
        for book in books {
            let id = book.id().to_string();
            writeln!(
                out,
                "#{} {} {} by {} ({}, {}) reads: {}{}",
                self.position(book.id()),
                &id[..8],
                book.name,
                book.author,
                book.genre,
                book.year,
                book.read_count(),
                if book.session().is_reading() {
                    " [reading]"
                } else {
                    ""
                }
            )?;
        }
        Ok(())
    }
}

fn one_ref(rest: &[String]) -> Result<&str> {
    match rest {
        [reference] => Ok(reference),
        [] => bail!("missing book reference"),
        _ => bail!("expected a single book reference"),
    }
}

fn limit_arg(arg: Option<&String>, default: usize) -> Result<usize> {
    match arg {
        None => Ok(default),
        Some(s) => match s.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => bail!("'{}' is not a valid limit", s),
        },
    }
}

/// Split `TERM... [N]`: a trailing number is the limit
fn term_and_limit(rest: &[String], default: usize) -> Result<(String, usize)> {
    match rest.split_last() {
        None => bail!("missing search term"),
        Some((last, init)) if !init.is_empty() && last.parse::<usize>().is_ok() => {
            Ok((init.join(" "), limit_arg(Some(last), default)?))
        }
        Some(_) => Ok((rest.join(" "), default)),
    }
}
