// Bridge Dashboard TUI
// Live-updating view of synthetic cross-chain bridge activity with a
// tabbed interface: overview cards, flow corridor, transaction pipeline
// and a filterable activity feed.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Terminal,
};

use bridgesim::address::mask_address;
use bridgesim::baseline::{NullBaseline, SnapshotFile};
use bridgesim::state::{BridgeState, Timers};
use bridgesim::types::{format_thousands, Chain, Transaction, TxStatus};
use bridgesim::Result;

// Tab enumeration for navigation
#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Flow,
    Pipeline,
    Activity,
}

impl Tab {
    fn next(self) -> Self {
        match self {
            Tab::Overview => Tab::Flow,
            Tab::Flow => Tab::Pipeline,
            Tab::Pipeline => Tab::Activity,
            Tab::Activity => Tab::Overview,
        }
    }

    fn previous(self) -> Self {
        match self {
            Tab::Overview => Tab::Activity,
            Tab::Flow => Tab::Overview,
            Tab::Pipeline => Tab::Flow,
            Tab::Activity => Tab::Pipeline,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "OVERVIEW",
            Tab::Flow => "CROSS-CHAIN FLOW",
            Tab::Pipeline => "PIPELINE",
            Tab::Activity => "ACTIVITY",
        }
    }
}

fn chain_color(chain: Chain) -> Color {
    match chain {
        Chain::Sol => Color::Magenta,
        Chain::Bsc => Color::Yellow,
        Chain::Tron => Color::Green,
        Chain::Eth => Color::Blue,
        Chain::Btc => Color::LightRed,
    }
}

fn status_color(status: TxStatus) -> Color {
    match status {
        TxStatus::Confirmed => Color::Green,
        TxStatus::Bridging => Color::Yellow,
        TxStatus::Pending => Color::LightRed,
        TxStatus::Failed => Color::DarkGray,
    }
}

fn format_usd(value: f64) -> String {
    format!("${}", format_thousands(value, 2))
}

fn format_age(tx: &Transaction) -> String {
    let secs = (chrono::Utc::now() - tx.created_at).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

fn route_spans(tx: &Transaction) -> Spans<'static> {
    Spans::from(vec![
        Span::styled(
            tx.source_chain.ticker(),
            Style::default()
                .fg(chain_color(tx.source_chain))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" -> "),
        Span::styled(
            tx.target_chain.ticker(),
            Style::default()
                .fg(chain_color(tx.target_chain))
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

// Render the tab navigation bar
fn render_tabs(f: &mut tui::Frame<CrosstermBackend<io::Stdout>>, area: Rect, current_tab: Tab) {
    let tabs = vec![Tab::Overview, Tab::Flow, Tab::Pipeline, Tab::Activity];
    let tab_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(25); 4])
        .split(area);

    for (i, tab) in tabs.iter().enumerate() {
        let style = if *tab == current_tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let paragraph = Paragraph::new(tab.title())
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).style(style));

        f.render_widget(paragraph, tab_chunks[i]);
    }
}

// Render the dashboard header with bridge identity and block height
fn render_header(
    f: &mut tui::Frame<CrosstermBackend<io::Stdout>>,
    area: Rect,
    state: &BridgeState,
) {
    let pool = state.pool();
    let header_text = format!(
        "ROSEN BRIDGE - CROSS-CHAIN MIXING PROTOCOL | {} | BLOCK {}",
        pool.bridge_status.to_uppercase(),
        format_thousands(pool.last_block_height as f64, 0),
    );

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn stat_card(title: &'static str, value: String, trend: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Spans::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(trend, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(title))
}

// Render overview tab content: stat cards, network panels, asset panels
fn render_overview_tab(
    f: &mut tui::Frame<CrosstermBackend<io::Stdout>>,
    area: Rect,
    state: &BridgeState,
) {
    let pool = state.pool();
    let trends = state.trends();
    let rollup = state.rollup();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Length(5), // Network panels
            Constraint::Length(5), // Asset panels
            Constraint::Min(0),
        ])
        .split(area);

    // Top overview cards
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(25); 4])
        .split(rows[0]);

    f.render_widget(
        stat_card(
            " TOTAL POOL VOLUME ",
            format_usd(pool.total_volume_usd),
            trends.volume_trend.clone(),
            Color::Cyan,
        ),
        cards[0],
    );
    f.render_widget(
        stat_card(
            " 24H TRANSACTIONS ",
            format_thousands(pool.tx_count_24h as f64, 0),
            trends.tx_hour_trend.clone(),
            Color::Green,
        ),
        cards[1],
    );
    f.render_widget(
        stat_card(
            " ACTIVE ADDRESSES ",
            format_thousands(pool.active_addresses as f64, 0),
            "Real-time monitoring".to_string(),
            Color::LightRed,
        ),
        cards[2],
    );
    f.render_widget(
        stat_card(
            " MIXING SPEED ",
            "1.2s".to_string(),
            "Average completion time".to_string(),
            Color::Yellow,
        ),
        cards[3],
    );

    // Network panels: Solana / BSC / bridge health
    let networks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[1]);

    let sol_panel = Paragraph::new(vec![
        Spans::from(format!("Status       : {}", pool.sol_node_status.to_uppercase())),
        Spans::from(format!(
            "Transactions : {}",
            format_thousands(pool.sol_tx_count as f64, 0)
        )),
        Spans::from(format!(
            "TPS          : {}",
            format_thousands(trends.sol_tps as f64, 0)
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Solana Network ")
            .border_style(Style::default().fg(chain_color(Chain::Sol))),
    );
    f.render_widget(sol_panel, networks[0]);

    let bsc_panel = Paragraph::new(vec![
        Spans::from(format!("Status       : {}", pool.bsc_node_status.to_uppercase())),
        Spans::from(format!(
            "Transactions : {}",
            format_thousands(pool.bsc_tx_count as f64, 0)
        )),
        Spans::from(format!(
            "TPS          : {}",
            format_thousands(trends.bsc_tps as f64, 0)
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" BSC Network ")
            .border_style(Style::default().fg(chain_color(Chain::Bsc))),
    );
    f.render_widget(bsc_panel, networks[1]);

    let bridge_panel = Paragraph::new(vec![
        Spans::from(format!("System  : {}", pool.bridge_status.to_uppercase())),
        Spans::from("Latency : 47ms"),
        Spans::from("Uptime  : 99.98%"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Bridge Status ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(bridge_panel, networks[2]);

    // Multi-chain asset panels over the in-memory ledger window
    let assets = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(25); 4])
        .split(rows[2]);

    let eth = rollup.get(Chain::Eth);
    let eth_panel = Paragraph::new(vec![
        Spans::from("Status : ONLINE"),
        Spans::from(format!("Txs    : {}", eth.tx_count)),
        Spans::from(format!("Volume : {}", format_usd(eth.usd_volume))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Ethereum ")
            .border_style(Style::default().fg(chain_color(Chain::Eth))),
    );
    f.render_widget(eth_panel, assets[0]);

    let tron = rollup.get(Chain::Tron);
    let tron_panel = Paragraph::new(vec![
        Spans::from("Status : ONLINE"),
        Spans::from(format!("Txs    : {}", tron.tx_count)),
        Spans::from(format!(
            "USDT   : {}",
            format_usd(rollup.tron_usdt_display(pool.total_volume_usd))
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" TRON ")
            .border_style(Style::default().fg(chain_color(Chain::Tron))),
    );
    f.render_widget(tron_panel, assets[1]);

    let btc = rollup.get(Chain::Btc);
    let btc_panel = Paragraph::new(vec![
        Spans::from("Status : ONLINE"),
        Spans::from(format!("Txs    : {}", btc.tx_count)),
        Spans::from(format!("Volume : {}", format_usd(btc.usd_volume))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Bitcoin ")
            .border_style(Style::default().fg(chain_color(Chain::Btc))),
    );
    f.render_widget(btc_panel, assets[2]);

    let pool_panel = Paragraph::new(vec![
        Spans::from("Chains : SOL/BSC/TRON/ETH"),
        Spans::from(format!(
            "Volume : {}",
            format_usd(rollup.usdt_bridge_display(pool.total_volume_usd))
        )),
        Spans::from(vec![
            Span::raw("Health : "),
            Span::styled(
                "OPTIMAL",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" USDT Bridge Pool ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(pool_panel, assets[3]);
}

// Render the cross-chain flow tab: SOL <-> BSC corridor plus last-hour
// asset volumes
fn render_flow_tab(
    f: &mut tui::Frame<CrosstermBackend<io::Stdout>>,
    area: Rect,
    state: &BridgeState,
) {
    let flow = state.flow();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // SOL | corridor | BSC
            Constraint::Length(5), // TRON / ETH / BTC hourly volumes
            Constraint::Min(0),
        ])
        .split(area);

    let corridor = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    let sol_box = Paragraph::new(vec![
        Spans::from(Span::styled(
            "SOLANA",
            Style::default()
                .fg(chain_color(Chain::Sol))
                .add_modifier(Modifier::BOLD),
        )),
        Spans::from("High-Speed Chain"),
        Spans::from(format!("{} tx / hour", flow.sol_tx_per_hour)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(chain_color(Chain::Sol))),
    );
    f.render_widget(sol_box, corridor[0]);

    let flows = Paragraph::new(vec![
        Spans::from(vec![
            Span::styled("SOL -> BSC (USDT)  ", Style::default().fg(Color::Magenta)),
            Span::raw(format!(
                "{} txs  {}",
                flow.sol_to_bsc_count,
                format_usd(flow.sol_to_bsc_volume)
            )),
        ]),
        Spans::from(vec![
            Span::styled("BSC -> SOL (USDT)  ", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "{} txs  {}",
                flow.bsc_to_sol_count,
                format_usd(flow.bsc_to_sol_volume)
            )),
        ]),
        Spans::from(Span::styled(
            "ACTIVE",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Corridor "));
    f.render_widget(flows, corridor[1]);

    let bsc_box = Paragraph::new(vec![
        Spans::from(Span::styled(
            "BSC",
            Style::default()
                .fg(chain_color(Chain::Bsc))
                .add_modifier(Modifier::BOLD),
        )),
        Spans::from("Smart Chain"),
        Spans::from(format!("{} tx / hour", flow.bsc_tx_per_hour)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(chain_color(Chain::Bsc))),
    );
    f.render_widget(bsc_box, corridor[2]);

    let volumes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[1]);

    let tron_vol = Paragraph::new(vec![
        Spans::from("USDT Volume (Last Hour)"),
        Spans::from(Span::styled(
            format_usd(flow.tron_usdt_volume),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" TRON ")
            .border_style(Style::default().fg(chain_color(Chain::Tron))),
    );
    f.render_widget(tron_vol, volumes[0]);

    let eth_vol = Paragraph::new(vec![
        Spans::from("USDT Volume (Last Hour)"),
        Spans::from(Span::styled(
            format_usd(flow.eth_usdt_volume),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" ETHEREUM ")
            .border_style(Style::default().fg(chain_color(Chain::Eth))),
    );
    f.render_widget(eth_vol, volumes[1]);

    let btc_vol = Paragraph::new(vec![
        Spans::from("BTC Volume (Last Hour)"),
        Spans::from(Span::styled(
            format!("{} BTC", format_thousands(flow.btc_volume, 4)),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" BITCOIN ")
            .border_style(Style::default().fg(chain_color(Chain::Btc))),
    );
    f.render_widget(btc_vol, volumes[2]);
}

// Three-step pipeline stages, each spanning a third of the progress range
const STAGE_LABELS: [&str; 3] = ["Source Confirmed", "Bridging", "Target Confirmed"];
const STAGE_SPAN: f64 = 33.33;

fn stage_marker(progress: f64, stage: usize) -> &'static str {
    let start = stage as f64 * STAGE_SPAN;
    if progress >= start + STAGE_SPAN {
        "[x]"
    } else if progress >= start {
        "[~]"
    } else {
        "[ ]"
    }
}

// Render the transaction pipeline tab: one gauge per tracked transaction
fn render_pipeline_tab(
    f: &mut tui::Frame<CrosstermBackend<io::Stdout>>,
    area: Rect,
    state: &BridgeState,
) {
    let visible = (area.height as usize / 3).max(1);

    let constraints: Vec<Constraint> = std::iter::repeat(Constraint::Length(3))
        .take(visible)
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (slot, entry) in slots.iter().zip(state.tracked().iter().take(visible)) {
        let tx = &entry.tx;
        let stages: Vec<String> = (0..3)
            .map(|i| format!("{} {}", stage_marker(entry.progress, i), STAGE_LABELS[i]))
            .collect();

        let title = format!(
            " {} -> {} | {} | {} | {} ",
            tx.source_chain,
            tx.target_chain,
            tx.format_amount(),
            mask_address(&tx.source_address),
            stages.join("  "),
        );

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(status_color(tx.status)).bg(Color::Black))
            .label(format!("{} {:.0}%", tx.status.label(), entry.progress))
            .ratio((entry.progress / 100.0).clamp(0.0, 1.0));

        f.render_widget(gauge, *slot);
    }
}

// Render the activity feed tab with the chain/status filters applied
fn render_activity_tab(
    f: &mut tui::Frame<CrosstermBackend<io::Stdout>>,
    area: Rect,
    state: &BridgeState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let filter = state.feed_filter;
    let chain_label = filter.chain.map(|c| c.ticker()).unwrap_or("ALL");
    let status_label = filter.status.map(|s| s.label()).unwrap_or("ALL");
    let feed = state.filtered_feed();

    let header_text = format!(
        "Live Activity Stream | {} shown | chain: {} (c) | status: {} (s)",
        feed.len(),
        chain_label,
        status_label,
    );
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let header_cells = ["Route", "Amount", "From", "Status", "Age", "Explorer"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        });
    let header_row = Row::new(header_cells).height(1);

    let visible = chunks[1].height.saturating_sub(3) as usize;
    let table_rows = feed.iter().take(visible).map(|tx| {
        // Keep just the explorer host so the column stays narrow
        let explorer = tx
            .explorer_url()
            .and_then(|url| url.split('/').nth(2).map(str::to_string))
            .unwrap_or_default();

        Row::new(vec![
            Cell::from(route_spans(tx)),
            Cell::from(tx.format_amount()),
            Cell::from(mask_address(&tx.source_address)),
            Cell::from(Span::styled(
                tx.status.label(),
                Style::default().fg(status_color(tx.status)),
            )),
            Cell::from(format_age(tx)),
            Cell::from(explorer),
        ])
    });

    let table = Table::new(table_rows)
        .header(header_row)
        .block(Block::default().borders(Borders::ALL).title(" Transactions "))
        .widths(&[
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(15),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Min(14),
        ])
        .column_spacing(1);

    f.render_widget(table, chunks[1]);
}

fn run_dashboard() -> Result<()> {
    // Initialize terminal
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Seed the simulation, merging a baseline snapshot when one is
    // configured in the environment
    let mut state = match SnapshotFile::from_env() {
        Some(source) => BridgeState::new(&source)?,
        None => BridgeState::new(&NullBaseline)?,
    };
    let mut timers = Timers::new(Instant::now());
    let mut current_tab = Tab::Overview;

    // Cooperative loop: poll input, fire due timers, draw. Everything runs
    // on this one thread so updates never interleave.
    loop {
        let wait = timers
            .until_next(Instant::now())
            .min(Duration::from_millis(100));
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Tab | KeyCode::Right => current_tab = current_tab.next(),
                    KeyCode::BackTab | KeyCode::Left => current_tab = current_tab.previous(),
                    KeyCode::Char('c') => state.feed_filter.cycle_chain(),
                    KeyCode::Char('s') => state.feed_filter.cycle_status(),
                    _ => {}
                }
            }
        }

        timers.fire_due(&mut state, Instant::now())?;

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3), // Header
                    Constraint::Length(3), // Tabs
                    Constraint::Min(10),   // Tab content
                    Constraint::Length(1), // Footer
                ])
                .split(f.size());

            render_header(f, chunks[0], &state);
            render_tabs(f, chunks[1], current_tab);

            match current_tab {
                Tab::Overview => render_overview_tab(f, chunks[2], &state),
                Tab::Flow => render_flow_tab(f, chunks[2], &state),
                Tab::Pipeline => render_pipeline_tab(f, chunks[2], &state),
                Tab::Activity => render_activity_tab(f, chunks[2], &state),
            }

            let footer = Paragraph::new(
                "Tab/arrows switch tabs | c: chain filter | s: status filter | q/Esc: quit",
            )
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
            f.render_widget(footer, chunks[3]);
        })?;
    }

    // Restore terminal
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()?;

    Ok(())
}

fn main() {
    if let Err(e) = run_dashboard() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
