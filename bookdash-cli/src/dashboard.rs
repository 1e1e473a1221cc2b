//! Interactive dashboard
//!
//! A menu loop over the three dashboard actions. Each pass reads one
//! action, runs it to completion and prints the outcome; failures are
//! reported and the loop continues until EOF or `quit`.

use crate::display::{action_banner, format_report};
use anyhow::Result;
use bookdash::config::Config;
use bookdash::render::{format_text, render};
use bookdash::{
    evaluate, reindex, Action, ProcessRunner, SearchRequest, SearchTransport, Searcher,
};
use std::io::{BufRead, Write};

pub struct Dashboard<'a, T, R> {
    config: &'a Config,
    searcher: Searcher<T>,
    runner: R,
}

impl<'a, T: SearchTransport, R: ProcessRunner> Dashboard<'a, T, R> {
    pub fn new(config: &'a Config, searcher: Searcher<T>, runner: R) -> Self {
        Dashboard {
            config,
            searcher,
            runner,
        }
    }

    /// Run the menu loop until the input is exhausted or the user quits
    pub async fn run<I: BufRead, O: Write>(&self, input: &mut I, output: &mut O) -> Result<()> {
        writeln!(output, "Book Search Engine Dashboard")?;

        loop {
            write_menu(output)?;
            let Some(choice) = prompt(input, output, "Select an action: ")? else {
                break;
            };

            match choice.to_lowercase().as_str() {
                "" => continue,
                "q" | "quit" | "exit" => break,
                _ => {}
            }

            let action = match choice.parse::<Action>() {
                Ok(action) => action,
                Err(_) => {
                    writeln!(output, "Unknown action: {}", choice)?;
                    continue;
                }
            };

            writeln!(output, "\n{}", action_banner(action))?;
            match action {
                Action::Search => {
                    if !self.search(input, output).await? {
                        break;
                    }
                }
                Action::Reindex => {
                    let result = reindex(&self.runner, &self.config.scripts).await;
                    self.write_outcome(output, result)?;
                }
                Action::Evaluate => {
                    let result = evaluate(&self.runner, &self.config.scripts).await;
                    self.write_outcome(output, result)?;
                }
            }
        }

        writeln!(output, "Goodbye!")?;
        Ok(())
    }

    /// One search interaction. Returns false when the input ran out.
    async fn search<I: BufRead, O: Write>(&self, input: &mut I, output: &mut O) -> Result<bool> {
        let Some(query) = prompt(input, output, "Enter your search query: ")? else {
            return Ok(false);
        };
        if query.is_empty() {
            return Ok(true);
        }

        let Some(page) = prompt(input, output, "Page Number [1]: ")? else {
            return Ok(false);
        };
        let page_number = if page.is_empty() {
            1
        } else {
            match page.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    writeln!(output, "Page number must be a positive integer")?;
                    return Ok(true);
                }
            }
        };

        let request = SearchRequest::new(
            query,
            &self.config.engine.index,
            self.config.search.page_size,
            page_number,
        )?;

        match self.searcher.search(&request).await {
            Ok(result) => write!(output, "{}", format_text(&render(&result)))?,
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                writeln!(output, "Search failed: {}", e)?;
            }
        }
        Ok(true)
    }

    fn write_outcome<O: Write>(
        &self,
        output: &mut O,
        result: bookdash::Result<bookdash::ActionReport>,
    ) -> Result<()> {
        match result {
            Ok(report) => write!(output, "{}", format_report(&report))?,
            Err(e) => writeln!(output, "✘ {}", e)?,
        }
        Ok(())
    }
}

fn write_menu<O: Write>(output: &mut O) -> std::io::Result<()> {
    writeln!(output, "\nActions:")?;
    for (i, action) in Action::ALL.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, action.title())?;
    }
    writeln!(output, "  q. Quit")
}

/// Print a prompt and read one trimmed line; `None` on EOF
fn prompt<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    message: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bookdash::search::SearchResponse;
    use bookdash::{Error, ProcessOutput, QueryBuilder};
    use serde_json::{json, Value};
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Mutex;

    struct StubTransport {
        bodies: Mutex<Vec<Value>>,
        fail: bool,
    }

    impl StubTransport {
        fn new(fail: bool) -> Self {
            StubTransport {
                bodies: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl SearchTransport for StubTransport {
        async fn search(&self, _index: &str, body: &Value) -> bookdash::Result<SearchResponse> {
            self.bodies.lock().unwrap().push(body.clone());
            if self.fail {
                return Err(Error::Http {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(serde_json::from_value(json!({
                "hits": {
                    "total": { "value": 1 },
                    "hits": [ { "_score": 3.0, "_source": { "Title": "Middlemarch", "Author": "George Eliot" } } ]
                }
            }))?)
        }
    }

    struct StubRunner {
        exit_code: i32,
    }

    #[async_trait]
    impl ProcessRunner for StubRunner {
        async fn run(
            &self,
            command: &str,
            args: &[String],
            _working_dir: &Path,
        ) -> bookdash::Result<ProcessOutput> {
            Ok(ProcessOutput {
                stdout: format!("{} {}", command, args.join(" ")),
                stderr: String::new(),
                exit_code: self.exit_code,
            })
        }
    }

    async fn run_session(input: &str, fail_search: bool, exit_code: i32) -> (String, Vec<Value>) {
        let config = Config::default();
        let transport = StubTransport::new(fail_search);
        let dashboard = Dashboard::new(
            &config,
            Searcher::new(transport, QueryBuilder::default()),
            StubRunner { exit_code },
        );

        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        dashboard.run(&mut reader, &mut out).await.unwrap();

        let bodies = dashboard.searcher_bodies();
        (String::from_utf8(out).unwrap(), bodies)
    }

    impl<'a, R: ProcessRunner> Dashboard<'a, StubTransport, R> {
        fn searcher_bodies(&self) -> Vec<Value> {
            self.searcher.transport().bodies.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn test_search_then_quit() {
        let (out, bodies) = run_session("1\nmiddlemarch\n3\nq\n", false, 0).await;

        assert!(out.contains("Total matching documents: 1"));
        assert!(out.contains("Middlemarch (Score: 3.00)"));
        assert!(out.contains("Author: George Eliot"));
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["from"], 40);
    }

    #[tokio::test]
    async fn test_blank_page_defaults_to_first() {
        let (_, bodies) = run_session("search\neliot\n\n", false, 0).await;
        assert_eq!(bodies[0]["from"], 0);
    }

    #[tokio::test]
    async fn test_empty_query_skips_search() {
        let (out, bodies) = run_session("1\n\nquit\n", false, 0).await;
        assert!(bodies.is_empty());
        assert!(!out.contains("Total matching documents"));
    }

    #[tokio::test]
    async fn test_invalid_page_is_reported() {
        let (out, bodies) = run_session("1\neliot\n0\nq\n", false, 0).await;
        assert!(out.contains("Page number must be a positive integer"));
        assert!(bodies.is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_keeps_loop_running() {
        let (out, _) = run_session("1\neliot\n1\n3\nq\n", true, 0).await;
        assert!(out.contains("Search failed: Search engine returned HTTP 502"));
        assert!(out.contains("Evaluation complete!"));
    }

    #[tokio::test]
    async fn test_reindex_and_evaluate() {
        let (out, _) = run_session("2\n3\n", false, 0).await;
        assert!(out.contains("Re-indexing Data"));
        assert!(out.contains("python3 index_books.py books.json"));
        assert!(out.contains("Indexing complete!"));
        assert!(out.contains("python3 evaluate.py"));
        assert!(out.contains("Evaluation complete!"));
    }

    #[tokio::test]
    async fn test_failed_script_reported() {
        let (out, _) = run_session("reindex\n", false, 1).await;
        assert!(out.contains("Indexing encountered an error. Check the logs for details."));
        assert!(out.contains("exit code 1"));
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let (out, _) = run_session("9\n", false, 0).await;
        assert!(out.contains("Unknown action: 9"));
    }
}
