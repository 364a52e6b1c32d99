//! Prompt templates for every pipeline stage
//!
//! Templates are embedded minijinja sources registered under dotted names.
//! Each stage renders exactly one template; the render helpers are the only
//! prompt-construction surface the rest of the pipeline sees.

use crate::error::Result;
use minijinja::{Environment, context};

const TECHNICAL_ANALYSIS: &str = r"You are an expert financial analyst. Analyse the technical data for the stock: {{ ticker }}.
Position under review: {{ purchase_context }}.
Be concrete and precise. Avoid generic answers and disclaimers.
Analyze trends, momentum, volatility, etc.
Make a concise report in Markdown format, containing:
- Stock price.
- Stock performance numbers.
- Stock YTD growth.
- Technical indicators (MACD, RSI, SMA etc.).

Technical Data:
---
{{ data_block }}
---";

const FINANCIAL_ANALYSIS: &str = r"You are an expert financial analyst.
Analyse this financial statement data for the stock: {{ ticker }}.
Position under review: {{ purchase_context }}.
Focus on the newest data, but also consider historical data.
Be concrete and precise. Avoid generic answers and disclaimers.

Make a concise report in Markdown format containing:
- Profitability.
- Growth.
- Upside and downside risk.
- Market and competition.

Financial Statement data:
---
{{ data_block }}
---";

const ADVISORY: &str = r"You are an expert financial advisor with expertise in trading on the stock market.
Be critical, concrete and precise. Avoid generic answers and disclaimers.

Analyse the Technical and Financial reports for {{ ticker }} ({{ purchase_context }}) and provide investment advice.
Based on the financial statement analysis ('Financial Report') and the technical data analysis ('Technical Report'),
try to assess whether the company will be profitable in the future.

Make a report in Markdown containing:
- Is the company profitable?
- Is there harmony between technical indicators and financials?
- What are the short and long term risks?
- What are the risk factors, i.e. geopolitical, macro, cyclical, technology, competition, financial trends.
- Make a Buy, Hold or Sell rating.

Technical Report:
---
{{ technical_report }}
---
Financial Report:
---
{{ financial_report }}
---";

const REFINE_REWRITE: &str = r"You are a financial analyst with expert knowledge about publicly traded stocks.
Evaluate this Stock Report and make it more readable.
Avoid making assumptions and stick to the facts.
Make sure there is a paragraph for both fundamental and technical analysis in the report.
If given, take the Instruction into consideration.
Do not cite the instruction.

Instruction: {{ instruction }}

Stock Report:
---
{{ report }}
---";

const REFINE_CRITIQUE: &str = r"Critique this report about a stock. Verify that the report is satisfactory and has good readability.
The report should be well laid out, easy to understand and capture the essence of the information.
If the text can be improved, provide your feedback as an instruction on what should be changed.
If no further improvement is needed, indicate this with a clear 'DONE' as the last word in your reply.
Do not repeat the report information. Only give your feedback.

Stock Report:
---
{{ report }}
---";

const SUMMARY: &str = r"Summarize this text.
Remember:
- Keep essential information.
- Preserve any buy/hold/sell rating.
- Clearly state which stock it is.
---
{{ report }}
---";

const PORTFOLIO_ADVICE: &str = r"You are a world class financial advisor.
Remember:
- Be concrete and precise. Avoid generic answers and disclaimers.
- Make output in Markdown.
- Prefer to present data in tables.

First task:
Provide advice on the quality of the portfolio.
Assess the individual stocks for both long term and short term positions.

Second task:
Based on the provided 'Stock Reports', give all the stocks in the portfolio a buy/hold/sell rating.
Put these ratings in a table.

Stock Reports:
---
{{ reports }}
---";

const PORTFOLIO_ASSESSMENT: &str = r"You are an expert financial advisor.
Be concise, concrete and precise. Avoid generic answers and disclaimers.

Based on the provided 'Portfolio Report', make an overall assessment of the quality of the portfolio.

Portfolio Report:
---
{{ advice }}
---";

/// Embedded prompt templates, one per pipeline stage
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    /// Build the library; fails only on a malformed embedded template
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("analysis.technical", TECHNICAL_ANALYSIS)?;
        env.add_template("analysis.financial", FINANCIAL_ANALYSIS)?;
        env.add_template("advisory.stock", ADVISORY)?;
        env.add_template("refine.rewrite", REFINE_REWRITE)?;
        env.add_template("refine.critique", REFINE_CRITIQUE)?;
        env.add_template("summary.report", SUMMARY)?;
        env.add_template("portfolio.advice", PORTFOLIO_ADVICE)?;
        env.add_template("portfolio.assessment", PORTFOLIO_ASSESSMENT)?;
        Ok(Self { env })
    }

    pub fn technical_analysis(
        &self,
        ticker: &str,
        purchase_context: &str,
        data_block: &str,
    ) -> Result<String> {
        Ok(self.env.get_template("analysis.technical")?.render(context! {
            ticker, purchase_context, data_block,
        })?)
    }

    pub fn financial_analysis(
        &self,
        ticker: &str,
        purchase_context: &str,
        data_block: &str,
    ) -> Result<String> {
        Ok(self.env.get_template("analysis.financial")?.render(context! {
            ticker, purchase_context, data_block,
        })?)
    }

    pub fn advisory(
        &self,
        ticker: &str,
        purchase_context: &str,
        technical_report: &str,
        financial_report: &str,
    ) -> Result<String> {
        Ok(self.env.get_template("advisory.stock")?.render(context! {
            ticker, purchase_context, technical_report, financial_report,
        })?)
    }

    pub fn refine_rewrite(&self, report: &str, instruction: &str) -> Result<String> {
        Ok(self.env.get_template("refine.rewrite")?.render(context! {
            report, instruction,
        })?)
    }

    pub fn refine_critique(&self, report: &str) -> Result<String> {
        Ok(self.env.get_template("refine.critique")?.render(context! { report })?)
    }

    pub fn summary(&self, report: &str) -> Result<String> {
        Ok(self.env.get_template("summary.report")?.render(context! { report })?)
    }

    pub fn portfolio_advice(&self, reports: &str) -> Result<String> {
        Ok(self.env.get_template("portfolio.advice")?.render(context! { reports })?)
    }

    pub fn portfolio_assessment(&self, advice: &str) -> Result<String> {
        Ok(self.env.get_template("portfolio.assessment")?.render(context! { advice })?)
    }
}
