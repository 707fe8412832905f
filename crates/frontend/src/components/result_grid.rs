use dioxus::prelude::*;
use solscout_shared::format::{format_number, format_usd, with_unit};
use solscout_shared::models::{AnalysisResult, Provenance, SolarEstimate};

#[derive(Debug, Clone, PartialEq)]
struct MetricCard {
    label: &'static str,
    value: String,
    class: &'static str,
}

fn card(label: &'static str, value: String, class: &'static str) -> MetricCard {
    MetricCard {
        label,
        value,
        class,
    }
}

/// Display cards for an estimate, in grid order.
fn metric_cards(estimate: &SolarEstimate) -> Vec<MetricCard> {
    vec![
        card("Roof Area", with_unit(estimate.roof_area_sqm(), "m²"), "metric-area"),
        card("System Size", with_unit(estimate.system_size_kw(), "kW"), "metric-size"),
        card(
            "Annual Energy",
            with_unit(estimate.annual_energy_kwh(), "kWh"),
            "metric-energy",
        ),
        card(
            "Panel Count",
            with_unit(estimate.panel_count().round(), "panels"),
            "metric-panels",
        ),
        card(
            "Annual Savings",
            format_usd(estimate.annual_savings_usd()),
            "metric-savings wide",
        ),
        card("CO2 Reduction", with_unit(estimate.co2_offset_tons(), "t"), "metric-co2"),
        card("ROI Period", with_unit(estimate.roi_years(), "yrs"), "metric-roi"),
    ]
}

fn provenance_badge(provenance: Provenance) -> (&'static str, &'static str) {
    match provenance {
        Provenance::Ai => ("AI Detected", "badge badge-ai"),
        Provenance::Manual => ("Manual Outline", "badge badge-manual"),
    }
}

#[component]
pub fn ResultGrid(result: AnalysisResult) -> Element {
    let cards = metric_cards(&result.estimate);
    let (badge_text, badge_class) = provenance_badge(result.provenance);
    let vertices = format_number(result.polygon.vertex_count() as f64);

    rsx! {
        div { class: "panel result-panel",
            div { class: "result-header",
                h3 { "Solar Potential" }
                span { class: "{badge_class}", "{badge_text}" }
            }
            div { class: "bento-grid",
                for c in cards {
                    div { class: "metric-card {c.class}",
                        span { class: "metric-label", "{c.label}" }
                        span { class: "metric-value", "{c.value}" }
                    }
                }
            }
            p { class: "result-footnote",
                "Outline with {vertices} vertices. Figures assume 4.5 peak sun hours, 18% panel efficiency and $0.12/kWh."
            }
        }
    }
}
