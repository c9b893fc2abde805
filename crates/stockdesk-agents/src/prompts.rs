use chrono::{Local, NaiveDate};
use stockdesk_models::Domain;

/// `March 03, 2025`: the date form used in task prompts and report headers.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

pub fn today_label() -> String {
    date_label(Local::now().date_naive())
}

/// Calculation tools a profile may carry besides its catalog tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    Accuracy,
    Pnl,
    RiskReward,
}

/// Fixed persona and invocation parameters of one LLM-backed role.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialistProfile {
    /// Display name, also used on the discovery card.
    pub name: &'static str,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub calculators: &'static [Calculator],
}

const MAX_TOKENS: u32 = 1500;

impl SpecialistProfile {
    pub fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Market => Self {
                name: "Market Intelligence Agent",
                role: "Senior Market Analyst",
                goal: "Analyze the latest market data for NASDAQ 100 and NSE 500 stocks. Identify \
                       the overall market trend (bullish/bearish/neutral), highlight the top movers \
                       (biggest gainers and losers), and summarize the market breadth (stocks up vs down).",
                backstory: "You are a veteran market analyst with 20 years of experience tracking both \
                            US (NASDAQ) and Indian (NSE) equity markets. You are quick to identify market \
                            regimes and unusual activity, and you write concise summaries a busy trader \
                            can act on immediately. You report data-driven observations, not opinions.",
                temperature: 0.3,
                max_tokens: MAX_TOKENS,
                calculators: &[],
            },
            Domain::Ml => Self {
                name: "ML Model Analyst Agent",
                role: "Machine Learning Performance Analyst",
                goal: "Evaluate both prediction strategies. Strategy 2 (AI Price Predictor): accuracy of \
                       the Linear Regression, Gradient Boosting and Random Forest models for price \
                       direction. Strategy 1 (ML Classifier): health of the Buy/Sell classifiers for \
                       NASDAQ (ml_trading_predictions), NSE (ml_nse_trading_predictions) and Forex \
                       (forex_ml_predictions), including signal counts, confidence levels and accuracy rates.",
                backstory: "You are a quantitative analyst who monitors ML models in financial prediction \
                            systems. You watch two separate pipelines: Strategy 2 uses three regression \
                            models to predict price direction (the direction_correct metric), while \
                            Strategy 1 uses classifiers that emit Buy/Sell signals with confidence \
                            percentages for NASDAQ, NSE and Forex. You always report on both strategies \
                            with concrete numbers across all three markets and call out any degradation \
                            or divergence.",
                temperature: 0.2,
                max_tokens: MAX_TOKENS,
                calculators: &[Calculator::Accuracy],
            },
            Domain::Technical => Self {
                name: "Technical Signal Agent",
                role: "Technical Analysis Specialist",
                goal: "Identify the strongest active buy and sell signals from the technical analysis \
                       system. Analyze signal strength scores, review which indicators (MACD, RSI, \
                       Bollinger Bands, Stochastic, Fibonacci, SMA, Pattern) are triggering, and \
                       evaluate the historical accuracy of signals at 7-day and 14-day horizons. \
                       Highlight the most reliable signal patterns.",
                backstory: "You are a chartered market technician (CMT) with deep experience in \
                            multi-indicator analysis. You know how MACD, RSI, Bollinger Bands, Stochastic \
                            oscillators, Fibonacci retracements, moving averages and candlestick patterns \
                            combine into high-probability setups. You validate every signal against its \
                            historical track record and only highlight signals with proven reliability.",
                temperature: 0.2,
                max_tokens: MAX_TOKENS,
                calculators: &[],
            },
            Domain::Strategy => Self {
                name: "Strategy & Trade Agent",
                role: "Trading Strategy Manager",
                goal: "Find and rank the top trade opportunities for today. Focus on TIER 1 and TIER 2 \
                       signals where AI predictions and technical analysis are ALIGNED. Present each \
                       opportunity with its ticker, direction (BULLISH/BEARISH), AI confidence, \
                       technical score, combined score, stop-loss, take-profit, risk/reward ratio and \
                       any warning flags. Also summarize overall strategy performance by tier.",
                backstory: "You are a senior trading strategist who combines quantitative AI predictions \
                            with classical technical analysis. The best trades occur when the models and \
                            the indicators agree (ALIGNED signals). You are disciplined about risk: \
                            stop-loss, take-profit, position sizing and risk/reward always come first, and \
                            you flag conflicting signals and high-risk setups so the trader can decide \
                            with full information.",
                temperature: 0.3,
                max_tokens: MAX_TOKENS,
                calculators: &[Calculator::RiskReward],
            },
            Domain::Forex => Self {
                name: "Forex Analysis Agent",
                role: "Forex Market Specialist",
                goal: "Analyze the latest forex rates and ML predictions for all tracked currency pairs, \
                       with particular focus on USD/INR. Report the latest rates, daily changes, position \
                       relative to the 50-day and 200-day moving averages, and any ML model signals \
                       (buy/sell/hold) with their confidence levels. Provide a concise forex outlook.",
                backstory: "You are an experienced forex analyst covering major and exotic pairs, with a \
                            special focus on USD/INR for Indian market exposure. You combine macro context \
                            (trends, rate differentials) with technical levels (moving averages, \
                            support/resistance) and ML predictions into one structured, actionable view.",
                temperature: 0.3,
                max_tokens: MAX_TOKENS,
                calculators: &[],
            },
            Domain::Risk => Self {
                name: "Risk Assessment Agent",
                role: "Risk Manager",
                goal: "Evaluate the overall risk posture across all markets. Identify high-risk positions \
                       where model disagreement is high, flag CONFLICTING signals where AI and technical \
                       analysis disagree, review active trading alerts, check portfolio positions and \
                       P&L, and give an overall risk summary. Also summarize family assets for a \
                       holistic wealth view.",
                backstory: "You are a certified risk manager (FRM) with institutional and personal \
                            portfolio experience. The biggest risk is rarely a single bad trade; it is \
                            hidden correlation, concentration and ignored warnings. You are meticulous \
                            about conflicting signals, high model disagreement and positions approaching \
                            their stop-loss, and you express risk in both dollar and percentage terms.",
                temperature: 0.2,
                max_tokens: MAX_TOKENS,
                calculators: &[Calculator::Pnl],
            },
            Domain::CrossStrategy => Self {
                name: "Cross-Strategy Analysis Agent",
                role: "Cross-Strategy Analyst",
                goal: "Find stocks that BOTH Strategy 1 (AI + Technical Combos) and Strategy 2 (ML \
                       classifier) recommend in the same direction. These dual confirmations are the \
                       highest-conviction opportunities. Also identify stocks where the two strategies \
                       CONFLICT as caution flags.",
                backstory: "You are a quantitative strategist specialising in multi-signal confirmation. \
                            When two independent methodologies agree on direction, the odds improve \
                            markedly. Strategy 1 combines AI price models with technical indicator combos \
                            and classifies signals into TIER 1 ULTRA and TIER 2 MODERATE. Strategy 2 uses \
                            ML Buy/Sell classification with confidence percentages plus RSI and assigns \
                            trade grades A through D. When both say SELL on the same stock, that is your \
                            highest-conviction short.",
                temperature: 0.2,
                max_tokens: MAX_TOKENS,
                calculators: &[],
            },
        }
    }

    /// The conversational assistant: combined catalog, ad hoc SQL and every calculator.
    pub fn chat_assistant() -> Self {
        Self {
            name: "Stock Data AI Assistant",
            role: "Stock Data AI Assistant",
            goal: "Answer any question about the user's stock market data, ML predictions, technical \
                   signals, trading strategies, forex, portfolio and family assets. Use predefined \
                   queries when available and write ad hoc SQL for custom questions. Always give clear, \
                   actionable answers backed by data.",
            backstory: CHAT_BACKSTORY,
            temperature: 0.3,
            max_tokens: MAX_TOKENS,
            calculators: &[Calculator::Accuracy, Calculator::Pnl, Calculator::RiskReward],
        }
    }

    /// System prompt sent with every request of this role.
    pub fn system_prompt(&self, today: &str) -> String {
        format!(
            "You are {role}.\n\n\
             {backstory}\n\n\
             Your personal goal is: {goal}\n\n\
             Current date: {today}\n\n\
             Use your tools to look up data before answering. Call a query tool with the exact \
             query name it lists; if a name is rejected, pick one from the list in the error. \
             When you have enough information, reply with your final answer as plain text.",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal,
        )
    }
}

const CHAT_BACKSTORY: &str = "You are a capable financial data assistant with deep knowledge of the \
user's SQL Server database of stock market data. You know the schema well:

MARKET DATA:
- nasdaq_100_hist_data (ticker, trading_date, open/high/low/close_price, volume)
- nse_500_hist_data (same schema as NASDAQ)
- nasdaq_100_fundamentals, nse_500_fundamentals

STRATEGY 2 (AI Price Prediction):
- ai_prediction_history (model_name: LR/GB/RF, ticker, predicted_price, actual_price, direction_correct, model_confidence)
- ml_technical_indicators (sma, ema, macd, rsi, volatility) for NASDAQ
- ml_nse_technical_indicators for NSE

STRATEGY 1 (ML Classifier):
- ml_trading_predictions (NASDAQ: predicted_signal, confidence_percentage, buy/sell_probability, signal_strength, direction_correct_1d)
- ml_nse_trading_predictions (NSE: same plus model_name, sector, market_cap_category)
- forex_ml_predictions (predicted_signal BUY/SELL, signal_confidence, prob_buy/sell/hold, direction_correct_1d)
- ml_prediction_summary, ml_nse_predict_summary (daily run statistics)

TECHNICAL SIGNALS:
- signal_tracking_history (signal_type, signal_strength, macd/rsi/bb/sma/stoch/fib/pattern_signal, result_7d/14d/30d)
- daily_signals_history

STRATEGY VIEWS:
- vw_PowerBI_AI_Technical_Combos (AI + technical combos, trade_tier TIER 1/2)
- vw_strategy2_trade_opportunities (ML signal + technical alignment, trade_grade A-D)
- trade_log, trading_alerts, prediction_watchlist

FOREX:
- forex_hist_data (symbol, close_price, daily_change_pct, fifty_day_avg, two_hundred_day_avg)

PERSONAL:
- portfolio_tracker (ticker, buy_price, buy_qty, status)
- family_assets (asset_type, item_name, purchase_value, current_status)
- stock_notes

Prefer the predefined queries (prefixed market_, ml_, tech_, strategy_, forex_, risk_, cross_) for \
common questions and write custom SQL for anything else. Explain findings clearly and concisely.";

/// A unit of work handed to a specialist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub description: String,
    pub expected_output: Option<String>,
}

impl TaskSpec {
    /// A bare message, as received over HTTP.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            description: text.into(),
            expected_output: None,
        }
    }

    /// The daily briefing task for `domain`, dated `today` (`%B %d, %Y`).
    pub fn briefing(domain: Domain, today: &str) -> Self {
        let (query, words, points, expected) = match domain {
            Domain::Market => (
                "the nasdaq_market_summary and nse_market_summary queries",
                200,
                "1. Market breadth (stocks up vs down) for each market\n\
                 2. Average daily change\n\
                 3. Overall sentiment (Bullish/Bearish/Neutral)",
                "Concise market summary under 200 words with key stats.",
            ),
            Domain::Ml => (
                "the model_accuracy_last_7_days query",
                150,
                "1. Each model's 7-day accuracy percentage\n\
                 2. Best performing model\n\
                 3. Any degradation warnings",
                "Concise model scorecard under 150 words.",
            ),
            Domain::Technical => (
                "the active_signals_today query",
                150,
                "1. Number of active buy vs sell signals\n\
                 2. Top 3 strongest signals with tickers\n\
                 3. Signal reliability assessment",
                "Concise signal summary under 150 words.",
            ),
            Domain::Strategy => (
                "the top_tier1_opportunities query",
                150,
                "1. Top 5 TIER 1 trade opportunities with ticker, direction, confidence\n\
                 2. Risk/reward highlights",
                "Concise trade opportunities under 150 words.",
            ),
            Domain::Forex => (
                "the forex_latest_rates query",
                150,
                "1. USD/INR current rate and daily change\n\
                 2. Key currency pair movements\n\
                 3. Trend vs moving averages",
                "Concise forex summary under 150 words.",
            ),
            Domain::Risk => (
                "the high_risk_positions query",
                150,
                "1. Number of high-risk positions\n\
                 2. Key risk warnings\n\
                 3. Overall risk rating (Low/Medium/High)",
                "Concise risk assessment under 150 words.",
            ),
            Domain::CrossStrategy => (
                "the common_stocks_both_strategies query",
                150,
                "1. Stocks both strategies recommend in the same direction\n\
                 2. Stocks where the strategies conflict\n\
                 3. The single highest-conviction setup",
                "Concise cross-strategy confirmation summary under 150 words.",
            ),
        };

        Self {
            description: format!(
                "Today is {today}. Run {query}. Provide a CONCISE summary (under {words} words) with:\n{points}"
            ),
            expected_output: Some(expected.to_string()),
        }
    }

    /// A single chat question.
    pub fn chat(question: &str, today: &str) -> Self {
        Self {
            description: format!(
                "Today is {today}. Answer the following user question using your SQL query tools. \
                 Be concise and data-driven.\n\nUser Question: {question}"
            ),
            expected_output: Some(
                "A clear, concise answer to the user's question with relevant data.".to_string(),
            ),
        }
    }

    /// The user turn that opens the conversation.
    pub fn prompt(&self) -> String {
        match &self.expected_output {
            Some(expected) => format!(
                "{}\n\nThis is the expected criteria for your final answer: {expected}",
                self.description
            ),
            None => self.description.clone(),
        }
    }
}
