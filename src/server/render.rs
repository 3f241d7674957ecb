//! HTML fragment for one leaderboard page.

use askama::Template;

use crate::config::Config;
use crate::core::{Control, NavTarget, PageResult, Source};
use crate::error::{LbError, Result};

/// Page-independent parts of the fragment, fixed at startup.
#[derive(Debug, Clone)]
pub struct FragmentLayout {
    pub window_days: u32,
    pub page_size_options: Vec<usize>,
    pub external_link_url: String,
}

impl FragmentLayout {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            window_days: config.scoring.window_days,
            page_size_options: config.pagination.page_size_options.clone(),
            external_link_url: config.display.external_link_url.clone(),
        }
    }
}

impl Default for FragmentLayout {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

struct RowCells {
    rank: usize,
    key: String,
    score: String,
    percent: String,
}

struct SizeOption {
    size: usize,
    href: String,
    selected: bool,
}

struct ControlLink {
    label: String,
    href: String,
    enabled: bool,
    current: bool,
}

#[derive(Template)]
#[template(
    source = r#"<div class="leaderboard" data-source="{{ source }}">
  {% if has_external_link %}<div class="bannerAnnouncement">Find the list of delegated block producers <a href="{{ external_link_url }}" target="_blank" rel="noopener">here</a></div>{% endif %}
  {% if has_last_modified %}<span class="list_last_update">Last updated {{ last_modified }}</span>{% endif %}
  <table class="table">
    <thead>
      <tr>
        <th scope="col">RANK</th>
        <th scope="col" class="text-left">PUBLIC KEY</th>
        {% if show_score %}<th scope="col">SCORE({{ window_days }}-Day)</th>{% endif %}
        <th scope="col">%(Max Score {{ max_score }})</th>
      </tr>
    </thead>
    <tbody>
      {% if maintenance %}
      <tr><td colspan="{{ colspan }}"><h1 class="maintenanceText">Under Maintenance</h1></td></tr>
      {% else if leaderboard_empty %}
      <tr><td colspan="{{ colspan }}">No scored block producers yet.</td></tr>
      {% else if rows.is_empty() %}
      <tr><td colspan="{{ colspan }}">No matching block producers.</td></tr>
      {% endif %}
      {% for row in rows %}
      <tr>
        <td scope="row">{{ row.rank }}</td>
        <td>{{ row.key }}</td>
        {% if show_score %}<td>{{ row.score }}</td>{% endif %}
        <td>{{ row.percent }} %</td>
      </tr>
      {% endfor %}
    </tbody>
  </table>
  <div class="selectNav_perpage">
    <p class="selectNav_perpage_title">Results Per Page</p>
    <select class="page-size" onchange="window.location.href = this.value">
      {% for option in size_options %}
      <option value="{{ option.href }}"{% if option.selected %} selected{% endif %}>{{ option.size }}</option>
      {% endfor %}
    </select>
  </div>
  <ul class="pagination">
    {% for control in controls %}
    {% if control.enabled %}
    <li class="page-item"><a class="page-link" href="{{ control.href }}">{{ control.label }}</a></li>
    {% else if control.current %}
    <li class="page-item active"><span class="page-link">{{ control.label }}</span></li>
    {% else %}
    <li class="page-item disabled"><span class="page-link">{{ control.label }}</span></li>
    {% endif %}
    {% endfor %}
  </ul>
</div>"#,
    ext = "html"
)]
struct PageFragment<'a> {
    source: Source,
    has_external_link: bool,
    external_link_url: &'a str,
    has_last_modified: bool,
    last_modified: &'a str,
    show_score: bool,
    window_days: u32,
    max_score: i64,
    colspan: usize,
    maintenance: bool,
    leaderboard_empty: bool,
    rows: Vec<RowCells>,
    size_options: Vec<SizeOption>,
    controls: Vec<ControlLink>,
}

/// Link for a pagination control, keeping the search term and snapshot.
pub fn control_href(
    source: Source,
    control: &Control,
    search: Option<&str>,
    token: Option<&str>,
) -> Option<String> {
    control.target.map(|target| target_href(source, target, search, token))
}

/// Link to the first page at `page_size`, keeping the search term and snapshot.
#[must_use]
pub fn page_size_href(
    source: Source,
    page_size: usize,
    search: Option<&str>,
    token: Option<&str>,
) -> String {
    let target = NavTarget {
        page_size,
        page_number: 1,
        offset: 0,
    };
    target_href(source, target, search, token)
}

fn target_href(
    source: Source,
    target: NavTarget,
    search: Option<&str>,
    token: Option<&str>,
) -> String {
    let mut href = format!(
        "/{source}/page?page_size={}&page_number={}&offset={}",
        target.page_size, target.page_number, target.offset
    );
    if let Some(term) = search {
        href.push_str("&search=");
        href.push_str(&urlencoding::encode(term));
    }
    if let Some(token) = token {
        href.push_str("&token=");
        href.push_str(&urlencoding::encode(token));
    }
    href
}

/// Render `page` as the table-plus-controls fragment.
pub fn page_fragment(
    page: &PageResult,
    token: Option<&str>,
    layout: &FragmentLayout,
) -> Result<String> {
    let search = page.search_term.as_deref();
    let rows = page
        .rows
        .iter()
        .map(|row| RowCells {
            rank: row.rank,
            key: row.key.clone(),
            score: row.score.map(|s| s.to_string()).unwrap_or_default(),
            percent: format_percent(row.score_percent),
        })
        .collect();
    let controls = page
        .controls
        .controls
        .iter()
        .map(|control| ControlLink {
            label: control.label.clone(),
            href: control_href(page.source, control, search, token).unwrap_or_default(),
            enabled: control.enabled,
            current: control.is_current_indicator(),
        })
        .collect();
    let mut sizes = layout.page_size_options.clone();
    if !sizes.contains(&page.page_size) {
        sizes.push(page.page_size);
        sizes.sort_unstable();
    }
    let size_options = sizes
        .into_iter()
        .map(|size| SizeOption {
            size,
            href: page_size_href(page.source, size, search, token),
            selected: size == page.page_size,
        })
        .collect();

    PageFragment {
        source: page.source,
        has_external_link: !layout.external_link_url.is_empty(),
        external_link_url: &layout.external_link_url,
        has_last_modified: page.stats.last_modified.is_some(),
        last_modified: page.stats.last_modified.as_deref().unwrap_or_default(),
        show_score: page.show_score,
        window_days: layout.window_days,
        max_score: page.stats.max_score,
        colspan: if page.show_score { 4 } else { 3 },
        maintenance: page.maintenance,
        leaderboard_empty: page.leaderboard_empty,
        rows,
        size_options,
        controls,
    }
    .render()
    .map_err(|err| LbError::Serialization(err.to_string()))
}

fn format_percent(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
