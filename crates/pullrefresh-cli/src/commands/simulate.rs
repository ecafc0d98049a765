use anyhow::Result;
use clap::Args;
use tokio::sync::mpsc;

use pullrefresh_core::{AppConfig, GestureEvent, PullController, PullEvent};
use pullrefresh_tui::DemoFeed;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Comma-separated drag deltas, e.g. 50,50,50 (put `--` first if the list starts negative)
    #[arg(value_delimiter = ',', allow_negative_numbers = true, required = true)]
    pub deltas: Vec<f64>,

    /// Override the pull threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Override the maximum pull distance
    #[arg(short, long)]
    pub max: Option<f64>,

    /// Make the refresh action fail
    #[arg(long)]
    pub fail: bool,

    /// Simulated refresh latency in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// End the gesture with a cancel instead of a release
    #[arg(long)]
    pub cancel: bool,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
}

pub async fn run(config: &AppConfig, args: SimulateArgs) -> Result<()> {
    let mut pull = config.pull.clone();
    if let Some(threshold) = args.threshold {
        pull.pull_threshold = threshold;
    }
    if let Some(max) = args.max {
        pull.max_pull_distance = max;
    }
    pull.enabled = true;

    let mut demo = config.demo.clone();
    if let Some(delay) = args.delay_ms {
        demo.refresh_delay_ms = delay;
    }
    if args.fail {
        demo.fail_every = 1;
    }

    let feed = DemoFeed::new(&demo);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = PullController::new(pull, feed.clone())?.with_event_sender(tx);

    controller.handle(GestureEvent::Start);
    for delta in &args.deltas {
        controller.handle(GestureEvent::Move { delta: *delta });
        if !args.json {
            println!(
                "move     {:+.1} -> distance {:.1}",
                delta,
                controller.distance()
            );
        }
        print_events(&mut rx, args.json)?;
    }

    controller.handle(if args.cancel {
        GestureEvent::Cancel
    } else {
        GestureEvent::Release
    });
    print_events(&mut rx, args.json)?;

    let mut failure = None;
    if controller.live_ticket().is_some() {
        if let Some(outcome) = controller.next_outcome().await {
            if let Err(e) = outcome.result {
                failure = Some(e);
            }
        }
        print_events(&mut rx, args.json)?;
    }

    // Let the return animation play out
    let tick = config.ui.animation_tick_duration();
    while controller.needs_update() {
        tokio::time::sleep(tick).await;
        controller.tick();
    }
    print_events(&mut rx, args.json)?;

    if !args.json {
        println!();
        println!("Final phase: {}", controller.phase());
        println!("Feed items:  {}", feed.len());
        if let Some(e) = failure {
            println!("Refresh error: {}", e);
        }
    }

    Ok(())
}

fn print_events(rx: &mut mpsc::UnboundedReceiver<PullEvent>, json: bool) -> Result<()> {
    while let Ok(event) = rx.try_recv() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", describe(&event));
        }
    }
    Ok(())
}

fn describe(event: &PullEvent) -> String {
    match event {
        PullEvent::PhaseChanged { from, to } => format!("phase    {} -> {}", from, to),
        PullEvent::Progress { value } => format!("progress {:.3}", value),
        PullEvent::RefreshStarted { ticket } => format!("refresh  started {}", ticket),
        PullEvent::RefreshFinished { ticket, ok } => {
            let status = if *ok { "ok" } else { "failed" };
            format!("refresh  finished {} ({})", ticket, status)
        }
    }
}
