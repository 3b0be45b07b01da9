// Interactive terminal dashboard: sector and company pickers, search, analyze, result tabs.

pub mod picker;
pub mod render;

use crate::analyzer::StockAnalyzer;
use crate::config::StockCatalog;
use picker::{company_label, filter_companies, is_quit, numbered, parse_choice};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{info, warn};

pub struct Dashboard<R, W> {
    catalog: StockCatalog,
    analyzer: StockAnalyzer,
    input: Lines<R>,
    out: W,
}

enum Step<T> {
    Chosen(T),
    Back,
    Quit,
}

impl<R, W> Dashboard<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(catalog: StockCatalog, analyzer: StockAnalyzer, input: R, out: W) -> Self {
        Self {
            catalog,
            analyzer,
            input: input.lines(),
            out,
        }
    }

    /// Runs until the user quits or input ends.
    pub async fn run(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "📊 FinBuddy Stock Analysis")?;
        loop {
            let sector = match self.pick_sector().await? {
                Step::Chosen(sector) => sector,
                Step::Back => continue,
                Step::Quit => break,
            };
            let (name, symbol) = match self.pick_company(&sector).await? {
                Step::Chosen(company) => company,
                Step::Back => continue,
                Step::Quit => break,
            };
            match self.confirm_analyze(&name, &symbol).await? {
                Step::Chosen(()) => self.analyze(&name, &symbol).await?,
                Step::Back => continue,
                Step::Quit => break,
            }
        }
        writeln!(self.out, "Goodbye.")?;
        Ok(())
    }

    async fn prompt(&mut self, text: &str) -> std::io::Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        self.input.next_line().await
    }

    async fn pick_sector(&mut self) -> std::io::Result<Step<String>> {
        let sectors: Vec<String> =
            self.catalog.sector_names().into_iter().map(String::from).collect();
        write!(self.out, "\nStock Selection\nSelect Sector:\n{}", numbered(&sectors))?;

        let question = format!("Sector [1-{}] (q to quit): ", sectors.len());
        let Some(line) = self.prompt(&question).await? else {
            return Ok(Step::Quit);
        };
        if is_quit(&line) {
            return Ok(Step::Quit);
        }
        match parse_choice(&line, sectors.len()) {
            Some(idx) => Ok(Step::Chosen(sectors[idx].clone())),
            None => {
                writeln!(self.out, "⚠️ Invalid choice")?;
                Ok(Step::Back)
            }
        }
    }

    async fn pick_company(&mut self, sector: &str) -> std::io::Result<Step<(String, String)>> {
        let Some(term) = self.prompt("Search companies (blank for all): ").await? else {
            return Ok(Step::Quit);
        };
        let companies: Vec<(String, String)> = {
            let all = self.catalog.companies(sector);
            filter_companies(&all, &term)
                .into_iter()
                .map(|(name, symbol)| (name.to_string(), symbol.to_string()))
                .collect()
        };
        if companies.is_empty() {
            writeln!(self.out, "⚠️ No companies match your search")?;
            return Ok(Step::Back);
        }

        let labels: Vec<String> = companies.iter().map(|(n, s)| company_label(n, s)).collect();
        write!(self.out, "Select Company:\n{}", numbered(&labels))?;
        let Some(line) = self.prompt(&format!("Company [1-{}]: ", companies.len())).await? else {
            return Ok(Step::Quit);
        };
        if is_quit(&line) {
            return Ok(Step::Quit);
        }
        match parse_choice(&line, companies.len()) {
            Some(idx) => Ok(Step::Chosen(companies[idx].clone())),
            None => {
                writeln!(self.out, "⚠️ Invalid choice")?;
                Ok(Step::Back)
            }
        }
    }

    async fn confirm_analyze(&mut self, name: &str, symbol: &str) -> std::io::Result<Step<()>> {
        let label = company_label(name, symbol);
        let question = format!("Press Enter to Analyze {label} (b to go back): ");
        let Some(line) = self.prompt(&question).await? else {
            return Ok(Step::Quit);
        };
        match line.trim().to_lowercase().as_str() {
            "" | "a" | "analyze" => Ok(Step::Chosen(())),
            other if is_quit(other) => Ok(Step::Quit),
            _ => Ok(Step::Back),
        }
    }

    async fn analyze(&mut self, name: &str, symbol: &str) -> std::io::Result<()> {
        writeln!(self.out, "Analyzing {name}...")?;
        match self.analyzer.analyze(name, symbol).await {
            Ok(result) => {
                info!("Rendering results for {}", symbol);
                write!(self.out, "{}", render::render_result(&result))?;
            }
            Err(e) => {
                warn!("❌ {}", e);
                writeln!(self.out, "❌ Failed to fetch stock data")?;
            }
        }
        Ok(())
    }
}
