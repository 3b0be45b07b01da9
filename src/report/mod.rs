// Report generation: context assembly followed by one language-model call.

pub mod context;
pub mod llm;

use crate::news::AggregatedNews;
use std::sync::Arc;
use tracing::{info, warn};

pub use context::ContextAssembler;
pub use llm::{LlmClient, OpenAiClient};

pub const NO_CONTEXT_MESSAGE: &str = "⚠️ Could not gather enough data to generate report";
pub const NO_API_KEY_MESSAGE: &str = "OpenAI API key required for report generation";

pub fn system_prompt(context: &str) -> String {
    format!(
        "You are a professional financial analyst. Generate a comprehensive report using this context:\n{context}"
    )
}

pub fn user_prompt(company_name: &str, symbol: &str) -> String {
    format!(
        "Create a detailed 5-part analysis report for {company_name} ({symbol}):\n\
         1) Business Overview\n2) Financial Health\n3) Recent Developments\n\
         4) Technical Analysis\n5) Investment Recommendation\n\n\
         Use professional tone with markdown formatting including ## headings and bullet points."
    )
}

pub struct ReportGenerator {
    assembler: ContextAssembler,
    llm: Option<Arc<dyn LlmClient>>,
}

impl ReportGenerator {
    /// `llm` is `None` when no model credential is configured.
    pub fn new(assembler: ContextAssembler, llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { assembler, llm }
    }

    /// Returns the model's text verbatim, or a readable placeholder when anything fails.
    /// Without already collected `news` the assembler gathers its own.
    pub async fn generate(
        &self,
        symbol: &str,
        company_name: &str,
        news: Option<&AggregatedNews>,
    ) -> String {
        let context = match news {
            Some(news) => self.assembler.assemble_with_news(symbol, company_name, news).await,
            None => self.assembler.assemble(symbol, company_name).await,
        };
        if context.trim().is_empty() {
            return NO_CONTEXT_MESSAGE.to_string();
        }

        let Some(llm) = &self.llm else {
            warn!("No language model configured, skipping report for {}", symbol);
            return NO_API_KEY_MESSAGE.to_string();
        };

        match llm.complete(&system_prompt(&context), &user_prompt(company_name, symbol)).await {
            Ok(report) => {
                info!("✅ Report generated for {} ({} chars)", symbol, report.len());
                report
            }
            Err(e) => {
                warn!("❌ Report generation failed for {}: {}", symbol, e);
                format!("⚠️ Report generation error: {e}")
            }
        }
    }
}
