//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for a month's sales:
//! - **Price Range Chart**: the number of products in each price range
//! - **Category Chart**: the share of products in each category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a HTML container and an inline initialization script.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};
use time::Month;

use crate::chart::{CategoryCount, PriceBucket};

/// The label shown for products without a category.
const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the price range and category charts for `month`.
pub(super) fn build_dashboard_charts(
    month: Month,
    buckets: &[PriceBucket],
    categories: &[CategoryCount],
) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "price-range-chart",
            options: price_range_chart(month, buckets).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(month, categories).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// The global that keeps the ECharts instances by container id.
const CHART_REGISTRY: &str = "dashboardCharts";

/// Generates the script that initializes the ECharts instances for `charts`.
///
/// The script runs immediately, so it must be placed after the chart containers.
/// htmx runs it again whenever the dashboard content is swapped in, so the
/// instances from the previous run are disposed and a single resize listener
/// is shared by every run.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let setup = format!(
        r#"if (!window.{CHART_REGISTRY}) {{
                window.{CHART_REGISTRY} = new Map();
                window.addEventListener('resize', () => {{
                    window.{CHART_REGISTRY}.forEach((chart) => chart.resize());
                }});
            }}"#
    );

    let init_charts = charts.iter().map(|chart| {
        format!(
            r#"(function() {{
                    window.{CHART_REGISTRY}.get("{id}")?.dispose();
                    const chartDom = document.getElementById("{id}");
                    const chart = echarts.init(chartDom);
                    const option = {options};
                    chart.setOption(option);
                    window.{CHART_REGISTRY}.set("{id}", chart);
                }})();"#,
            id = chart.id,
            options = escape_script_text(&chart.options)
        )
    });

    let script_content = std::iter::once(setup)
        .chain(init_charts)
        .collect::<Vec<_>>()
        .join("\n");

    html!(
        script { (PreEscaped(script_content)) }
    )
}

/// Stop text from user data, e.g. a category of "</script>", ending the script element early.
fn escape_script_text(text: &str) -> String {
    text.replace("</", "<\\/")
}

fn price_range_chart(month: Month, buckets: &[PriceBucket]) -> Chart {
    let labels: Vec<String> = buckets.iter().map(|bucket| bucket.bucket.clone()).collect();
    let counts: Vec<f64> = buckets.iter().map(|bucket| bucket.count as f64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Price Range")
                .subtext(format!("Products listed in {month}")),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(bar::Bar::new().name("Products").data(counts))
}

fn category_chart(month: Month, categories: &[CategoryCount]) -> Chart {
    let labels: Vec<&str> = categories
        .iter()
        .map(|category| category.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL))
        .collect();
    let data: Vec<(f64, &str)> = categories
        .iter()
        .zip(labels)
        .map(|(category, label)| (category.count as f64, label))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Categories")
                .subtext(format!("Products listed in {month}")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Products")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[cfg(test)]
mod tests {
    use time::Month;

    use crate::chart::{CategoryCount, PriceBucket};

    use super::{build_dashboard_charts, charts_script, escape_script_text};

    #[test]
    fn chart_options_contain_labels() {
        let buckets = vec![PriceBucket {
            bucket: "0-100".to_owned(),
            min: 0,
            max: Some(100),
            count: 4,
        }];
        let categories = vec![
            CategoryCount {
                category: Some("electronics".to_owned()),
                count: 2,
            },
            CategoryCount {
                category: None,
                count: 1,
            },
        ];

        let [price_range, category] = build_dashboard_charts(Month::March, &buckets, &categories);

        assert_eq!(price_range.id, "price-range-chart");
        assert!(price_range.options.contains("0-100"));
        assert_eq!(category.id, "category-chart");
        assert!(category.options.contains("electronics"));
        assert!(category.options.contains("Uncategorized"));
    }

    #[test]
    fn script_replaces_charts_and_adds_one_resize_listener() {
        let charts = build_dashboard_charts(Month::March, &[], &[]);

        let script = charts_script(&charts).into_string();

        assert_eq!(script.matches("addEventListener").count(), 1);
        assert_eq!(script.matches("echarts.init").count(), 2);
        assert_eq!(script.matches(".dispose()").count(), 2);
        for chart in &charts {
            assert!(
                script.contains(&format!(".set(\"{}\", chart)", chart.id)),
                "{} is not registered",
                chart.id
            );
        }
    }

    #[test]
    fn script_cannot_be_closed_by_chart_data() {
        let categories = vec![CategoryCount {
            category: Some("</script><b>".to_owned()),
            count: 1,
        }];
        let charts = build_dashboard_charts(Month::March, &[], &categories);

        let script = charts_script(&charts).into_string();

        assert_eq!(script.matches("</script>").count(), 1);
        assert_eq!(escape_script_text("a</b"), "a<\\/b");
    }
}
