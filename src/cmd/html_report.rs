//! HTML report generation for scenario comparisons
//!
//! Generates a self-contained HTML file with embedded CSS/JS: the results table,
//! a stacked bar chart of where the gross income goes, and explanatory notes.

use super::compare::{outcomes, Outcome};
use super::ScenarioArgs;
use crate::money::{format_eur, format_pct};
use crate::tax::{IncomeInput, RateSheet, ScenarioConfig, ScenarioKind, Warning};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HtmlCommand {
    #[command(flatten)]
    scenarios: ScenarioArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl HtmlCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let resolved = self.scenarios.load()?;
        let fingerprint = fingerprint(&resolved.configs)?;
        let outcomes = outcomes(resolved.configs);

        let html = generate(&outcomes, &resolved.warnings, &fingerprint);

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML report written to: {}", output_path.display());
        } else {
            let temp_path = std::env::temp_dir().join("incomec-report.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Chart components in stacking order, with their colours
pub const CHART_COMPONENTS: [(&str, &str); 6] = [
    ("Net Income", "rgb(53, 167, 137)"),
    ("Personal Tax", "rgb(251, 133, 0)"),
    ("Corporate Tax", "rgb(255, 65, 54)"),
    ("Dividend Tax", "rgb(128, 0, 128)"),
    ("Social Security", "rgb(55, 83, 109)"),
    ("Company Expenses", "rgb(169, 169, 169)"),
];

/// Data structure for embedding in HTML as JSON
#[derive(Serialize)]
pub struct HtmlReportData {
    pub generated_at: String,
    pub fingerprint: String,
    pub components: Vec<ComponentJson>,
    pub scenarios: Vec<ScenarioRow>,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct ComponentJson {
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Serialize)]
pub struct ScenarioRow {
    pub label: &'static str,
    pub income: String,
    pub gross_income: String,
    pub company_expenses: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct BreakdownRow {
    pub net_income: String,
    pub personal_tax: String,
    pub corporate_tax: String,
    pub dividend_tax: String,
    pub social_security: String,
    pub retention: String,
    /// Raw amounts per chart component, in `CHART_COMPONENTS` order
    pub amounts: Vec<String>,
}

impl From<&Outcome> for ScenarioRow {
    fn from(outcome: &Outcome) -> Self {
        let config = &outcome.config;
        let income = match config.income {
            IncomeInput::Annual { .. } => "annual".to_string(),
            IncomeInput::Hourly {
                hourly_rate,
                hours_per_week,
            } => format!(
                "{} × {} h/week × 48",
                format_eur(hourly_rate),
                hours_per_week.normalize()
            ),
        };

        let breakdown = outcome.result.as_ref().ok().map(|r| BreakdownRow {
            net_income: format_eur(r.net_income),
            personal_tax: format_eur(r.personal_tax),
            corporate_tax: format_eur(r.corporate_tax),
            dividend_tax: format_eur(r.dividend_tax),
            social_security: format_eur(r.social_security),
            retention: format_pct(r.retention_pct),
            amounts: [
                r.net_income,
                r.personal_tax,
                r.corporate_tax,
                r.dividend_tax,
                r.social_security,
                r.company_expenses,
            ]
            .iter()
            .map(|a| a.round_dp(2).normalize().to_string())
            .collect(),
        });

        ScenarioRow {
            label: config.label(),
            income,
            gross_income: config
                .gross_income
                .map(format_eur)
                .unwrap_or_else(|| "n/a".to_string()),
            company_expenses: format_eur(config.company_expenses),
            breakdown,
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct FingerprintEntry {
    scenario: ScenarioKind,
    income: IncomeInput,
    company_expenses: Decimal,
    rates: RateSheet,
}

/// SHA-256 over the resolved scenario inputs, so a report can be matched to them
pub fn fingerprint(configs: &[ScenarioConfig]) -> anyhow::Result<String> {
    let entries: Vec<_> = configs
        .iter()
        .map(|c| FingerprintEntry {
            scenario: c.kind,
            income: c.income,
            company_expenses: c.company_expenses.normalize(),
            rates: c.family.rates(),
        })
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&entries)?);
    Ok(hex::encode(hasher.finalize()))
}

/// Generate HTML report content
pub fn generate(outcomes: &[Outcome], warnings: &[Warning], fingerprint: &str) -> String {
    let data = HtmlReportData {
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        fingerprint: fingerprint.to_string(),
        components: CHART_COMPONENTS
            .iter()
            .map(|&(name, color)| ComponentJson { name, color })
            .collect(),
        scenarios: outcomes.iter().map(ScenarioRow::from).collect(),
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
    };
    let json_data = serde_json::to_string(&data)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Income Scenario Calculator</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Income Scenario Calculator</h1>
        <p class="subtitle">Net income compared across employment and company structures in the Netherlands</p>
    </header>

    <main>
        <section class="data-section">
            <h2>Results Table</h2>
            <div class="table-container">
                <table id="results-table">
                    <thead>
                        <tr>
                            <th>Scenario</th>
                            <th>Income</th>
                            <th>Gross Income</th>
                            <th>Company Expenses</th>
                            <th>Net Income</th>
                            <th>Personal Tax</th>
                            <th>Corporate Tax</th>
                            <th>Dividend Tax</th>
                            <th>Social Security</th>
                            <th>Retention %</th>
                        </tr>
                    </thead>
                    <tbody id="results-body"></tbody>
                </table>
            </div>
            <ul class="warnings" id="warnings"></ul>
        </section>

        <section class="data-section">
            <h2>Income Breakdown</h2>
            <div id="chart"></div>
            <div class="legend" id="legend"></div>
        </section>

        <section class="data-section notes">
            <h2>Notes</h2>
            <ul>
                <li>All calculations are simplified approximations</li>
                <li>Tax rates and deductions are based on the 2023 Dutch tax system</li>
                <li>BV scenarios with a capped salary pay 40% of gross as salary, at most €60,000</li>
                <li>The ZZP (self-employed) scenario includes the self-employment deduction</li>
                <li>Annual income for hourly scenarios assumes 48 working weeks</li>
                <li>Negative amounts are listed in the table but not drawn in the chart</li>
            </ul>
        </section>
    </main>

    <footer>
        Generated <span id="generated-at"></span> · inputs <code id="fingerprint"></code>
    </footer>

    <script>
const DATA = {json_data};

function escapeHtml(text) {{
    const div = document.createElement('div');
    div.textContent = text;
    return div.innerHTML;
}}

function renderTable() {{
    const tbody = document.getElementById('results-body');
    let html = '';

    DATA.scenarios.forEach(s => {{
        html += `<tr><td>${{escapeHtml(s.label)}}</td><td>${{escapeHtml(s.income)}}</td>`;
        html += `<td class="number">${{s.gross_income}}</td><td class="number">${{s.company_expenses}}</td>`;
        if (s.breakdown) {{
            const b = s.breakdown;
            [b.net_income, b.personal_tax, b.corporate_tax, b.dividend_tax, b.social_security, b.retention]
                .forEach(v => {{ html += `<td class="number">${{v}}</td>`; }});
        }} else {{
            html += `<td colspan="6" class="error">${{escapeHtml(s.error || 'not computed')}}</td>`;
        }}
        html += '</tr>';
    }});

    tbody.innerHTML = html;

    const warnings = document.getElementById('warnings');
    warnings.innerHTML = DATA.warnings.map(w => `<li>${{escapeHtml(w)}}</li>`).join('');
}}

function renderChart() {{
    const width = 900, height = 500;
    const margin = {{ top: 20, right: 20, bottom: 150, left: 90 }};
    const plotW = width - margin.left - margin.right;
    const plotH = height - margin.top - margin.bottom;

    const bars = DATA.scenarios.map(s => {{
        const amounts = s.breakdown ? s.breakdown.amounts.map(a => Math.max(0, parseFloat(a))) : [];
        return {{ label: s.label, amounts, total: amounts.reduce((t, a) => t + a, 0) }};
    }});
    const maxTotal = Math.max(1, ...bars.map(b => b.total));
    const slot = plotW / Math.max(1, bars.length);
    const barW = slot * 0.6;
    const y = v => plotH - (v / maxTotal) * plotH;

    let svg = `<svg viewBox="0 0 ${{width}} ${{height}}" role="img" aria-label="Income breakdown">`;
    svg += `<g transform="translate(${{margin.left}},${{margin.top}})">`;

    for (let i = 0; i <= 5; i++) {{
        const v = maxTotal * i / 5;
        svg += `<line x1="0" x2="${{plotW}}" y1="${{y(v)}}" y2="${{y(v)}}" class="grid"/>`;
        svg += `<text x="-8" y="${{y(v) + 4}}" class="axis" text-anchor="end">€${{Math.round(v).toLocaleString('en-GB')}}</text>`;
    }}

    bars.forEach((bar, idx) => {{
        const x = idx * slot + (slot - barW) / 2;
        let acc = 0;
        bar.amounts.forEach((amount, c) => {{
            if (amount <= 0) return;
            const top = y(acc + amount);
            const h = y(acc) - top;
            const comp = DATA.components[c];
            svg += `<rect x="${{x}}" y="${{top}}" width="${{barW}}" height="${{h}}" fill="${{comp.color}}">`;
            svg += `<title>${{escapeHtml(bar.label)}} · ${{comp.name}}: €${{amount.toLocaleString('en-GB', {{ minimumFractionDigits: 2 }})}}</title></rect>`;
            acc += amount;
        }});
        const lx = x + barW / 2, ly = plotH + 12;
        svg += `<text x="${{lx}}" y="${{ly}}" class="axis" text-anchor="end" transform="rotate(-75 ${{lx}} ${{ly}})">${{escapeHtml(bar.label)}}</text>`;
    }});

    svg += `<text x="${{-plotH / 2}}" y="-70" class="axis-title" transform="rotate(-90)" text-anchor="middle">Amount in Euros</text>`;
    svg += '</g></svg>';
    document.getElementById('chart').innerHTML = svg;

    document.getElementById('legend').innerHTML = DATA.components
        .map(c => `<span><i style="background:${{c.color}}"></i>${{c.name}}</span>`)
        .join('');
}}

document.getElementById('generated-at').textContent = DATA.generated_at;
document.getElementById('fingerprint').textContent = DATA.fingerprint.slice(0, 16);
renderTable();
renderChart();
    </script>
</body>
</html>
"##,
        css = CSS,
        json_data = json_data,
    )
}

const CSS: &str = r#"
:root { --border: #d9dde3; --muted: #5f6b7a; --bg: #f6f7f9; }
* { box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; background: var(--bg); color: #1d2733; font-size: 14px; }
header { background: #fff; border-bottom: 1px solid var(--border); padding: 16px 24px; }
header h1 { margin: 0; font-size: 22px; }
.subtitle { margin: 4px 0 0; color: var(--muted); }
main { padding: 16px 24px; display: grid; gap: 16px; }
.data-section { background: #fff; border: 1px solid var(--border); border-radius: 8px; padding: 16px; }
.data-section h2 { margin: 0 0 12px; font-size: 16px; }
.table-container { overflow-x: auto; }
table { border-collapse: collapse; width: 100%; }
th, td { padding: 6px 10px; border-bottom: 1px solid var(--border); text-align: left; white-space: nowrap; }
th { background: var(--bg); font-weight: 600; }
td.number { text-align: right; font-variant-numeric: tabular-nums; }
td.error { color: #b42318; }
.warnings { color: #9a6700; margin: 8px 0 0; padding-left: 18px; }
#chart svg { width: 100%; max-width: 900px; height: auto; }
.grid { stroke: #e6e8eb; }
.axis { font-size: 11px; fill: var(--muted); }
.axis-title { font-size: 12px; fill: #1d2733; }
.legend { display: flex; flex-wrap: wrap; gap: 12px; margin-top: 8px; }
.legend i { display: inline-block; width: 12px; height: 12px; margin-right: 6px; border-radius: 2px; vertical-align: -1px; }
.notes ul { margin: 0; padding-left: 18px; line-height: 1.6; }
footer { padding: 8px 24px 24px; color: var(--muted); font-size: 12px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn default_configs() -> Vec<ScenarioConfig> {
        ScenarioKind::ALL
            .iter()
            .map(|&k| ScenarioConfig::default_for(k))
            .collect()
    }

    #[test]
    fn report_embeds_all_scenarios() {
        let outcomes = outcomes(default_configs());
        let html = generate(&outcomes, &[], "abc123");

        for kind in ScenarioKind::ALL {
            assert!(html.contains(&serde_json::to_string(kind.label()).unwrap()));
        }
        assert!(html.contains("rgb(53, 167, 137)"));
        assert!(html.contains("\"fingerprint\":\"abc123\""));
    }

    #[test]
    fn chart_amounts_follow_component_order() {
        let outcomes = outcomes(vec![ScenarioConfig::default_for(ScenarioKind::RegularSalary)]);
        let row = ScenarioRow::from(&outcomes[0]);
        let amounts = row.breakdown.unwrap().amounts;

        assert_eq!(amounts, vec!["80550", "59415", "0", "0", "10035", "0"]);
    }

    #[test]
    fn fingerprint_changes_with_inputs() {
        let configs = default_configs();
        let a = fingerprint(&configs).unwrap();
        assert_eq!(a, fingerprint(&configs).unwrap());
        assert_eq!(a.len(), 64);

        let mut changed = configs.clone();
        changed[0].company_expenses = rust_decimal_macros::dec!(1000);
        assert_ne!(a, fingerprint(&changed).unwrap());
    }
}
