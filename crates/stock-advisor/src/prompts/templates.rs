//! Prompt templates for every analysis mode

use advisor_prompt::{JinjaTemplate, Result};

// ============================================================================
// Investor style
// ============================================================================

/// Shared company facts placed before every persona block
pub fn investor_preamble() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.preamble",
        r#"As a stock market expert, analyze {{ ticker }} ({{ name }}) in the style of {{ investor }}.
Use the following information about the company:

Business Summary: {{ business_summary }}

Financial Data:
- Current Price: {{ current_price }}
- P/E Ratio: {{ pe_ratio }}
- Forward P/E: {{ forward_pe }}
- PEG Ratio: {{ peg_ratio }}
- Dividend Yield: {{ dividend_yield }}
- Market Cap: {{ market_cap }}
- EPS: {{ eps }}
- Book Value: {{ book_value }}
- Price to Book: {{ price_to_book }}
- Debt to Equity: {{ debt_to_equity }}
- Return on Equity: {{ return_on_equity }}
- Free Cash Flow: {{ free_cash_flow }}
- Operating Margins: {{ operating_margins }}
- Profit Margins: {{ profit_margins }}
- Revenue Growth: {{ revenue_growth }}
- Earnings Growth: {{ earnings_growth }}

Sector: {{ sector }}
Industry: {{ industry }}"#,
    )
}

pub fn buffett() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.buffett",
        r#"Analyze this stock in Warren Buffett's style, focusing on:
1. The company's economic moat and competitive advantages
2. The quality of management and capital allocation
3. The stability and predictability of earnings
4. Whether the stock is trading at a discount to its intrinsic value
5. Long-term growth prospects and sustainability
6. Return on invested capital (ROIC)
7. The margin of safety in the current stock price

Use Buffett's value investing principles and his famous quotes. Consider whether this is a "wonderful company at a fair price" or a "fair company at a wonderful price." Evaluate if this company has the characteristics that would make Buffett consider it for his long-term, concentrated portfolio.

Format your response with clear sections for:
- Initial impression
- Business quality analysis
- Management assessment
- Financial strength
- Valuation
- Risks and concerns
- Conclusion with a buy/hold/sell recommendation"#,
    )
}

pub fn lynch() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.lynch",
        r#"Analyze this stock using Peter Lynch's investment style, focusing on:
1. What category the stock falls into: slow grower, stalwart, fast grower, cyclical, turnaround, or asset play
2. The PEG ratio and whether growth is reasonably priced
3. The company's "story" and whether it's easy to understand
4. Potential catalysts for future growth
5. Whether this is a business that an average person could understand
6. Signs that might indicate this is a "ten-bagger" opportunity

Use Lynch's down-to-earth, common-sense approach. Consider his principle of "invest in what you know" and his preference for companies with boring names and boring businesses in dull industries.

Format your response with clear sections for:
- Stock category (according to Lynch's classifications)
- The company's "story"
- Growth analysis and PEG ratio
- Competitive position
- Potential catalysts
- Red flags or concerns
- Conclusion with a buy/hold/sell recommendation"#,
    )
}

pub fn munger() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.munger",
        r#"Analyze this stock using Charlie Munger's mental models and investment philosophy, focusing on:
1. The "four essential filters": a business you can understand, favorable long-term prospects, trustworthy management, and attractive price
2. The quality of the business and its competitive position using his "moat and castle" framework
3. Incentive structures within the company and potential agency problems
4. Potential psychological biases affecting the market's view of this company
5. The margin of safety in the current valuation

Use Munger's multidisciplinary approach and his emphasis on rational thinking. Consider his focus on avoiding stupidity rather than seeking brilliance, and his preference for paying fair prices for great businesses rather than cheap prices for mediocre ones.

Format your response with clear sections for:
- Initial assessment
- Business quality and competitive moat
- Management quality and incentive structures
- Psychological factors affecting valuation
- Risks and potential pitfalls
- Conclusion with a buy/hold/sell recommendation"#,
    )
}

pub fn dalio() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.dalio",
        r#"Analyze this stock using Ray Dalio's principles and macroeconomic approach, focusing on:
1. How this company fits into the current phase of the economic cycle
2. Debt levels and vulnerability to economic shifts
3. Correlation with broader market movements and potential as a portfolio diversifier
4. Sensitivity to inflation, interest rates, and currency movements
5. Global trends affecting the business and its resilience to various economic scenarios

Use Dalio's emphasis on understanding the "economic machine" and finding uncorrelated return streams. Consider his principles of radical transparency and thoughtful disagreement.

Format your response with clear sections for:
- Macroeconomic positioning
- Debt and balance sheet analysis
- Correlation with economic indicators
- Inflation and interest rate sensitivity
- Global exposure and risks
- Portfolio fit (would this help or hurt diversification)
- Conclusion with a buy/hold/sell recommendation"#,
    )
}

pub fn wood() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.wood",
        r#"Analyze this stock using Cathie Wood's innovation-focused investment approach, focusing on:
1. The company's position in disruptive innovation and transformative technologies
2. Growth potential and addressable market size
3. The S-curve adoption phase of the technology or service
4. How the company might benefit from Wright's Law (cost declines with cumulative production)
5. The company's potential to disrupt traditional industries
6. Network effects and scalability

Use Wood's focus on five innovation platforms: DNA sequencing, robotics, energy storage, artificial intelligence, and blockchain technology. Consider her emphasis on convergence between technologies and her long-term investment horizon.

Format your response with clear sections for:
- Innovation category and disruptive potential
- Addressable market analysis
- Technology adoption phase
- Competitive advantage in innovation
- Growth metrics and valuation
- Risks to the innovation thesis
- Conclusion with a buy/hold/sell recommendation"#,
    )
}

pub fn generic() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "investor.generic",
        r"Provide a detailed stock analysis covering:
1. Business fundamentals
2. Financial health
3. Valuation
4. Growth prospects
5. Risks and challenges
6. Conclusion with a buy/hold/sell recommendation",
    )
}

// ============================================================================
// Valuation and chart modes
// ============================================================================

pub fn intrinsic_value() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "intrinsic_value",
        r"As a financial analyst specializing in valuation, calculate and explain the intrinsic value of {{ ticker }} ({{ name }}).

Use multiple valuation methods including:
1. Discounted Cash Flow (DCF) Analysis
2. Dividend Discount Model (if applicable)
3. Comparable Company Analysis (using industry P/E, P/B, P/S ratios)
4. Graham's Number (Benjamin Graham's formula)
5. Asset-based valuation

Current financial data:
- Current Price: {{ current_price }}
- EPS (TTM): {{ eps }}
- Forward EPS: {{ forward_eps }}
- Book Value Per Share: {{ book_value }}
- Free Cash Flow: {{ free_cash_flow }}
- Historical Growth Rate: {{ earnings_growth }}
- Expected 5-Year Growth Rate: {{ earnings_quarterly_growth }}
- Current P/E Ratio: {{ pe_ratio }}
- Industry Average P/E: Calculate based on peers
- Dividend Yield: {{ dividend_yield }}
- Beta: {{ beta }}

For the DCF calculation:
- Use a discount rate that accounts for the company's risk profile, beta, and current market conditions
- Project cash flows for 5-10 years with justifiable growth assumptions
- Calculate a terminal value using a reasonable perpetuity growth rate

For each valuation method:
1. Show your calculations step-by-step
2. Explain key assumptions you're making
3. Provide a sensitivity analysis for critical variables
4. Discuss the strengths and limitations of each approach for this specific company

Conclude with:
1. A range of intrinsic values derived from different methods
2. Your assessment of which valuation method is most appropriate for this company and why
3. The margin of safety at current prices
4. A buy/hold/sell recommendation based on the valuation analysis",
    )
}

pub fn technical() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "technical",
        r"As a professional technical analyst, provide a comprehensive technical analysis for {{ ticker }}.

Use the following technical analysis tools and concepts:
1. Trend Analysis
   - Primary trend direction (bullish, bearish, or neutral)
   - Support and resistance levels
   - Trendlines and channels
   - Price patterns (head and shoulders, double tops/bottoms, triangles, etc.)

2. Moving Averages
   - 50-day and 200-day simple moving averages
   - Golden crosses or death crosses
   - Price relative to key moving averages

3. Momentum Indicators
   - Relative Strength Index (RSI)
   - MACD (Moving Average Convergence Divergence)
   - Stochastic oscillator
   - Rate of Change (ROC)

4. Volume Analysis
   - Volume trends and abnormalities
   - On-balance volume (OBV)
   - Volume by price

5. Volatility Measures
   - Bollinger Bands
   - Average True Range (ATR)

6. Chart Patterns
   - Identify any significant chart patterns
   - Measure targets based on pattern projections
   - Failure levels where patterns would be invalidated

For each indicator or analysis method:
1. Explain what it's showing
2. How it should be interpreted for this specific stock
3. What trading signals it might be generating

Conclude with:
1. A summary of the technical position (strong buy, buy, neutral, sell, strong sell)
2. Key price levels to watch (immediate support/resistance, stop-loss levels)
3. Potential price targets based on your technical analysis
4. Timeframe considerations (short-term vs. medium-term outlook)
5. Any notable divergences between price action and indicators

Recent price data sample: {{ history }}",
    )
}

pub fn elliott_wave() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "elliott_wave",
        r"As an expert in Elliott Wave Theory, provide a comprehensive Elliott Wave analysis for {{ ticker }}.

Use the following aspects of Elliott Wave Theory:
1. Wave Identification
   - Identify the current position within the five-wave impulse and three-wave corrective pattern
   - Determine if we are in impulse waves (1, 3, 5) or corrective waves (2, 4, A, B, C)
   - Identify wave degrees (Grand Supercycle, Supercycle, Cycle, Primary, Intermediate, Minor, Minute, Minuette, Subminuette)

2. Fibonacci Relationships
   - Analyze Fibonacci retracements and extensions within the identified waves
   - Look for common Fibonacci relationships (wave 3 often extends to 161.8% of wave 1, wave 4 often retraces to 38.2% of wave 3)
   - Check for Fibonacci time relationships

3. Wave Characteristics
   - Examine the personality of each wave (wave 3 typically strongest, wave 5 often shows divergence)
   - Analyze volume characteristics of each wave
   - Check for wave alternation (if wave 2 is sharp, wave 4 is typically flat, or vice versa)

4. Pattern Recognition
   - Identify key Elliott Wave patterns (triangles, flats, zigzags)
   - Look for ending diagonals, leading diagonals, or triangle patterns
   - Check for wave extensions, particularly in wave 3

5. Wave Counting Guidelines
   - Apply the rules of wave counting (wave 3 never shortest, wave 4 never overlaps wave 1, etc.)
   - Consider alternative wave counts
   - Discuss confidence level in the primary wave count

Based on your Elliott Wave analysis, provide:
1. Current wave position and count
2. Potential price targets for completion of the current wave
3. Expected next wave movement with price targets
4. Critical invalidation levels
5. Trading implications based on the analysis
6. Time expectations for the current and next wave movements

Include a disclaimer about the subjective nature of Elliott Wave analysis and the importance of risk management and alternative scenarios.

Format your response with clear sections for:
- Current Elliott Wave Count
- Wave Characteristics Analysis
- Price Targets
- Invalidation Levels
- Trading Strategy Implications
- Alternative Wave Counts
- Risk Assessment

Recent price data sample: {{ history }}",
    )
}

// ============================================================================
// Market conditions
// ============================================================================

pub fn market_condition() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        "market_condition",
        r"As a market strategist, provide a comprehensive analysis of current market conditions and the broader economic environment.

Current Market Indicators:
- S&P 500 (SPY) 1-Month Performance: {{ spy }}
- Nasdaq 100 (QQQ) 1-Month Performance: {{ qqq }}
- Russell 2000 (IWM) 1-Month Performance: {{ iwm }}
- VIX (Volatility Index) Current Level: {{ vix }}

Sector Performance (1-Month):
{{ sectors }}

Analyze the following aspects of the current market environment:

1. Market Trend Analysis
   - Overall market direction (bull, bear, or transitional market)
   - Market breadth and internals
   - Relative performance of large caps vs. small caps
   - Growth vs. value performance

2. Sector Rotation
   - Leading and lagging sectors
   - Defensive vs. cyclical sector performance
   - Sector rotation implications for the economic cycle
   - Opportunities in specific sectors based on current trends

3. Risk Assessment
   - Volatility levels and trends
   - Credit spreads and fixed income signals
   - Correlation between asset classes
   - Potential market risks on the horizon

4. Economic Indicators
   - Interest rate environment and Federal Reserve positioning
   - Inflation trends and expectations
   - Employment and consumer spending outlook
   - Corporate earnings trends

5. Technical Market Position
   - Key support and resistance levels for major indices
   - Overbought/oversold conditions
   - Significant chart patterns or technical signals
   - Volume trends and money flow

6. Investment Strategy Implications
   - Appropriate asset allocation in the current environment
   - Sectors or themes that merit overweight positions
   - Defensive measures to consider if applicable
   - Time horizon considerations for different strategies

Provide a well-structured analysis with clear explanations of the data's significance. Conclude with an overall market outlook and general positioning advice for investors with different time horizons (short-term traders, medium-term investors, and long-term investors).",
    )
}
