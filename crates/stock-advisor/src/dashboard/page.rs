//! Dashboard page model and HTML template
//!
//! The page is a single MiniJinja template. Auto-escaping is on (the
//! template name ends in `.html`); the only value marked safe is the
//! formatter's markup.

use super::chart::PriceChart;
use crate::engine::{Analysis, AnalysisMode, Persona};
use crate::indicators::TrendSignals;
use crate::metrics::{MetricCard, format_large_number, key_metrics};
use crate::model::StockData;
use minijinja::{Environment, HtmlEscape};
use serde::Serialize;

const TEMPLATE_NAME: &str = "dashboard.html";

pub const DISCLAIMER: &str = "This tool is for informational purposes only and does not constitute financial advice. AI-generated analyses can be wrong. Always do your own research before investing.";

/// One `<option>` of a select box
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Company and price section
#[derive(Debug, Clone, Serialize)]
pub struct StockView {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub country: String,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub price: String,
    pub change: String,
    pub range: String,
    pub market_cap: String,
    pub bars: usize,
    pub metrics: Vec<MetricCard>,
}

impl StockView {
    pub fn from_data(data: &StockData) -> Self {
        let snapshot = &data.snapshot;
        let or_unknown = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
        let price = snapshot.current_price.or_else(|| data.history.last_close());

        let range = match (snapshot.fifty_two_week_low, snapshot.fifty_two_week_high) {
            (Some(low), Some(high)) => format!("${low:.2} - ${high:.2}"),
            _ => "N/A".to_string(),
        };

        Self {
            ticker: snapshot.ticker.clone(),
            name: snapshot.display_name().to_string(),
            sector: or_unknown(&snapshot.sector),
            industry: or_unknown(&snapshot.industry),
            country: or_unknown(&snapshot.country),
            website: snapshot.website.clone().filter(|url| is_web_url(url)),
            summary: snapshot.business_summary.clone(),
            price: price.map_or_else(|| "N/A".to_string(), |p| format!("${p:.2}")),
            change: data
                .history
                .percent_change()
                .map_or_else(|| "N/A".to_string(), |c| format!("{c:+.2}%")),
            range,
            market_cap: format_large_number(snapshot.market_cap),
            bars: data.history.len(),
            metrics: key_metrics(snapshot),
        }
    }
}

/// Only plain http(s) links are rendered as `href`s
fn is_web_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

/// Trend signal lines
#[derive(Debug, Clone, Serialize)]
pub struct SignalsView {
    pub ma50: String,
    pub ma200: String,
    pub cross: Option<String>,
    pub bullish: bool,
}

impl From<&TrendSignals> for SignalsView {
    fn from(signals: &TrendSignals) -> Self {
        Self {
            ma50: format!("{} (MA50 ${:.2})", signals.ma50.describe("MA50"), signals.ma50.average),
            ma200: format!("{} (MA200 ${:.2})", signals.ma200.describe("MA200"), signals.ma200.average),
            cross: signals.cross.map(|c| c.message().to_string()),
            bullish: signals.cross == Some(crate::indicators::Cross::Golden),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub title: String,
    /// Formatter output, rendered unescaped
    pub html: String,
}

impl From<&Analysis> for AnalysisView {
    fn from(analysis: &Analysis) -> Self {
        Self {
            title: analysis.title.clone(),
            html: analysis.formatted.clone(),
        }
    }
}

/// Everything the template needs
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub ticker: String,
    pub modes: Vec<SelectOption>,
    pub personas: Vec<SelectOption>,
    pub show_persona: bool,
    pub disclaimer: &'static str,
    pub api_key_missing: bool,
    pub error: Option<String>,
    pub stock: Option<StockView>,
    pub signals: Option<SignalsView>,
    pub chart: Option<PriceChart>,
    pub analysis: Option<AnalysisView>,
}

impl PageView {
    pub fn new(ticker: &str, mode: AnalysisMode, persona: Persona) -> Self {
        Self {
            ticker: ticker.to_string(),
            modes: AnalysisMode::ALL
                .iter()
                .map(|m| SelectOption {
                    value: m.slug(),
                    label: m.label(),
                    selected: *m == mode,
                })
                .collect(),
            personas: Persona::NAMED
                .iter()
                .map(|p| SelectOption {
                    value: p.slug(),
                    label: p.display_name(),
                    selected: *p == persona,
                })
                .collect(),
            show_persona: mode.uses_persona(),
            disclaimer: DISCLAIMER,
            api_key_missing: false,
            error: None,
            stock: None,
            signals: None,
            chart: None,
            analysis: None,
        }
    }
}

fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, DASHBOARD_TEMPLATE)?;
    Ok(env)
}

/// Render the dashboard page
pub fn render(view: &PageView) -> Result<String, minijinja::Error> {
    let env = environment()?;
    env.get_template(TEMPLATE_NAME)?.render(view)
}

/// Last-resort page when the template itself fails
pub fn fallback(message: &str) -> String {
    format!(
        "<!doctype html><html><body><p>An error occurred: {}</p></body></html>",
        HtmlEscape(message)
    )
}

const DASHBOARD_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{% if stock %}{{ stock.ticker }} - {% endif %}AI Stock Advisor</title>
<style>
  body { font-family: 'Segoe UI', Arial, sans-serif; margin: 0 auto; max-width: 1100px; padding: 20px; color: #212121; }
  h1 { color: #0D47A1; margin-bottom: 4px; }
  .disclaimer { background: #FFF8E1; border-left: 4px solid #FFA000; padding: 10px 14px; margin: 12px 0 20px; font-size: 14px; }
  form { display: flex; flex-wrap: wrap; gap: 12px; align-items: end; margin-bottom: 20px; }
  label { display: flex; flex-direction: column; font-size: 13px; color: #616161; }
  input, select, button { font-size: 15px; padding: 6px 10px; }
  button { background: #1E88E5; color: white; border: none; border-radius: 4px; cursor: pointer; }
  .error { background: #FFEBEE; border-left: 4px solid #C62828; padding: 10px 14px; margin-bottom: 16px; }
  .warning { background: #FFF3E0; border-left: 4px solid #EF6C00; padding: 10px 14px; margin-bottom: 16px; }
  .info { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; margin: 10px 0; }
  .price { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; margin: 16px 0; }
  .stat { background: #F5F5F5; border-radius: 6px; padding: 10px; }
  .stat .label { font-size: 12px; color: #757575; }
  .stat .value { font-size: 20px; font-weight: bold; }
  .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; margin: 16px 0; }
  .metric { border-left: 4px solid; border-radius: 4px; background: #FAFAFA; padding: 8px 12px; }
  .metric .status { font-size: 12px; font-weight: bold; }
  .signals { margin: 16px 0; }
  .chart { margin: 16px 0; }
  .chart svg { width: 100%; height: auto; background: #FAFAFA; border-radius: 6px; }
  .chart .legend { font-size: 13px; color: #616161; display: flex; gap: 16px; }
  .bullish { color: #2E7D32; font-weight: bold; }
  .bearish { color: #C62828; font-weight: bold; }
</style>
</head>
<body>
<h1>AI Stock Advisor</h1>
<div class="disclaimer"><strong>Disclaimer:</strong> {{ disclaimer }}</div>

<form method="get" action="/">
  <label>Ticker symbol
    <input type="text" name="ticker" value="{{ ticker }}" placeholder="AAPL" autofocus>
  </label>
  <label>Analysis type
    <select name="mode" id="mode">
      {% for mode in modes %}<option value="{{ mode.value }}"{% if mode.selected %} selected{% endif %}>{{ mode.label }}</option>
      {% endfor %}
    </select>
  </label>
  <label id="persona-row"{% if not show_persona %} style="display:none"{% endif %}>Investor
    <select name="persona">
      {% for persona in personas %}<option value="{{ persona.value }}"{% if persona.selected %} selected{% endif %}>{{ persona.label }}</option>
      {% endfor %}
    </select>
  </label>
  <button type="submit">Analyze</button>
</form>
<script>
  document.getElementById("mode").addEventListener("change", function (e) {
    document.getElementById("persona-row").style.display = e.target.value === "investor" ? "" : "none";
  });
</script>

{% if error %}<div class="error">{{ error }}</div>{% endif %}

{% if stock %}
<h2>{{ stock.name }} ({{ stock.ticker }})</h2>
<div class="info">
  <div class="stat"><div class="label">Sector</div><div>{{ stock.sector }}</div></div>
  <div class="stat"><div class="label">Industry</div><div>{{ stock.industry }}</div></div>
  <div class="stat"><div class="label">Country</div><div>{{ stock.country }}</div></div>
  <div class="stat"><div class="label">Website</div><div>{% if stock.website %}<a href="{{ stock.website }}" rel="noopener">{{ stock.website }}</a>{% else %}N/A{% endif %}</div></div>
</div>
{% if stock.summary %}<details><summary>Business summary</summary><p>{{ stock.summary }}</p></details>{% endif %}

<div class="price">
  <div class="stat"><div class="label">Current price</div><div class="value">{{ stock.price }}</div></div>
  <div class="stat"><div class="label">Change ({{ stock.bars }} sessions)</div><div class="value">{{ stock.change }}</div></div>
  <div class="stat"><div class="label">52-week range</div><div class="value">{{ stock.range }}</div></div>
  <div class="stat"><div class="label">Market cap</div><div class="value">{{ stock.market_cap }}</div></div>
</div>

<h3>Key metrics</h3>
<div class="metrics">
  {% for card in stock.metrics %}<div class="metric metric-{{ card.status }}" style="border-color: {{ card.color }}">
    <div class="label">{{ card.label }}</div>
    <div class="value">{{ card.display }}</div>
    <div class="status" style="color: {{ card.color }}">{{ card.status_label }}</div>
  </div>
  {% endfor %}
</div>

{% if chart %}
<div class="chart">
  <h3>Price history</h3>
  <svg viewBox="0 0 {{ chart.width }} {{ chart.height }}" role="img" aria-label="Closing prices">
    <polyline fill="none" stroke="#1E88E5" stroke-width="2" points="{{ chart.close }}"/>
    {% if chart.ma50 %}<polyline fill="none" stroke="#FB8C00" stroke-width="1.5" points="{{ chart.ma50 }}"/>{% endif %}
    {% if chart.ma200 %}<polyline fill="none" stroke="#8E24AA" stroke-width="1.5" points="{{ chart.ma200 }}"/>{% endif %}
  </svg>
  <div class="legend">
    <span>{{ chart.start }} to {{ chart.end }}</span>
    <span>Low {{ chart.low }}</span>
    <span>High {{ chart.high }}</span>
    <span style="color: #1E88E5">Close</span>
    {% if chart.ma50 %}<span style="color: #FB8C00">MA50</span>{% endif %}
    {% if chart.ma200 %}<span style="color: #8E24AA">MA200</span>{% endif %}
  </div>
</div>
{% endif %}

{% if signals %}
<div class="signals">
  <h3>Trend signals</h3>
  <ul>
    <li>{{ signals.ma50 }}</li>
    <li>{{ signals.ma200 }}</li>
    {% if signals.cross %}<li class="{% if signals.bullish %}bullish{% else %}bearish{% endif %}">{{ signals.cross }}</li>{% endif %}
  </ul>
</div>
{% endif %}
{% endif %}

{% if api_key_missing %}<div class="warning">API key is missing. Please check your configuration.</div>{% endif %}

{% if analysis %}
<h2>{{ analysis.title }}</h2>
{{ analysis.html|safe }}
{% endif %}
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StockSnapshot;
    use crate::model::fixtures::{apple, history};

    #[test]
    fn test_template_parses() {
        assert!(environment().is_ok());
    }

    #[test]
    fn test_empty_page() {
        let html = render(&PageView::new("", AnalysisMode::InvestorStyle, Persona::Buffett)).unwrap();

        assert!(html.contains("does not constitute financial advice"));
        assert!(html.contains(r#"<option value="buffett" selected>Warren Buffett</option>"#));
        assert!(html.contains(r#"<option value="investor" selected>Famous Investor Style</option>"#));
        assert!(!html.contains(r#"id="persona-row" style="display:none""#));
        assert!(!html.contains(r#"<div class="error">"#));
    }

    #[test]
    fn test_persona_hidden_for_other_modes() {
        let html = render(&PageView::new("", AnalysisMode::Technical, Persona::Buffett)).unwrap();
        assert!(html.contains(r#"id="persona-row" style="display:none""#));
    }

    #[test]
    fn test_stock_section_and_metric_colours() {
        let data = StockData {
            snapshot: apple(),
            history: history(&[180.0, 187.44]),
        };
        let mut view = PageView::new("AAPL", AnalysisMode::InvestorStyle, Persona::Buffett);
        view.stock = Some(StockView::from_data(&data));

        let html = render(&view).unwrap();
        assert!(html.contains("Apple Inc. (AAPL)"));
        assert!(html.contains("$187.44"));
        assert!(html.contains("$2910.00B"));
        assert!(html.contains("$164.08 - $199.62"));
        assert!(html.contains("Dividend Yield"));
        assert!(html.contains("Concerning"));
        assert!(html.contains("Favorable"));
    }

    #[test]
    fn test_user_values_are_escaped() {
        let mut snapshot = StockSnapshot::empty("EVIL");
        snapshot.name = Some("<script>alert(1)</script>".to_string());
        let data = StockData {
            snapshot,
            history: history(&[1.0]),
        };
        let mut view = PageView::new("<b>", AnalysisMode::Technical, Persona::Buffett);
        view.stock = Some(StockView::from_data(&data));

        let html = render(&view).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains(r#"value="<b>""#));
    }

    #[test]
    fn test_analysis_markup_is_not_escaped() {
        let mut view = PageView::new("AAPL", AnalysisMode::Technical, Persona::Buffett);
        view.analysis = Some(AnalysisView {
            title: "Technical Analysis".to_string(),
            html: r#"<div style="line-height:1.6;">Looks <b>strong</b></div>"#.to_string(),
        });

        let html = render(&view).unwrap();
        assert!(html.contains("<h2>Technical Analysis</h2>"));
        assert!(html.contains(r#"<div style="line-height:1.6;">Looks <b>strong</b></div>"#));
    }

    #[test]
    fn test_script_website_is_dropped() {
        let mut snapshot = apple();
        snapshot.website = Some("javascript:alert(1)".to_string());
        let data = StockData {
            snapshot,
            history: history(&[1.0]),
        };
        assert_eq!(StockView::from_data(&data).website, None);

        let data = StockData {
            snapshot: apple(),
            history: history(&[1.0]),
        };
        assert_eq!(
            StockView::from_data(&data).website.as_deref(),
            Some("https://www.apple.com")
        );
    }

    #[test]
    fn test_chart_with_overlays() {
        let closes: Vec<f64> = (0..260).map(|i| 100.0 + f64::from(i)).collect();
        let data = StockData {
            snapshot: apple(),
            history: history(&closes),
        };
        let mut view = PageView::new("AAPL", AnalysisMode::Technical, Persona::Buffett);
        view.stock = Some(StockView::from_data(&data));
        view.chart = PriceChart::from_history(&data.history).unwrap();

        let html = render(&view).unwrap();
        assert!(html.contains(r#"<svg viewBox="0 0 1000 320""#));
        assert_eq!(html.matches("<polyline").count(), 3);
        assert!(html.contains(">MA200</span>"));
    }

    #[test]
    fn test_short_chart_has_no_overlays() {
        let data = StockData {
            snapshot: apple(),
            history: history(&[1.0, 2.0, 3.0]),
        };
        let mut view = PageView::new("AAPL", AnalysisMode::Technical, Persona::Buffett);
        view.stock = Some(StockView::from_data(&data));
        view.chart = PriceChart::from_history(&data.history).unwrap();

        let html = render(&view).unwrap();
        assert_eq!(html.matches("<polyline").count(), 1);
        assert!(!html.contains(">MA50</span>"));
    }

    #[test]
    fn test_fallback_escapes() {
        let html = fallback("<oops>");
        assert!(html.contains("&lt;oops&gt;"));
    }
}
