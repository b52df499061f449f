use super::*;

#[test]
fn download_progress_ticks_up_to_cap() {
    let mut progress = DownloadProgress::start("weights.bin");
    assert_eq!(progress.percent, 0);
    for _ in 0..30 {
        progress = progress.tick(9);
        assert!(progress.percent <= DOWNLOAD_CAP);
    }
    assert_eq!(progress.percent, DOWNLOAD_CAP);
    assert!(!progress.done);
}

#[test]
fn download_progress_zero_step_holds() {
    let progress = DownloadProgress::start("a").tick(4).tick(0);
    assert_eq!(progress.percent, 4);
}

#[test]
fn download_progress_finishes_at_100_and_stops_ticking() {
    let done = DownloadProgress::start("a").tick(7).finish();
    assert_eq!(done.percent, 100);
    assert!(done.done);
    assert_eq!(done.clone().tick(9), done);
}

#[test]
fn star_toggle_adjusts_count() {
    let unstarred = StarState { starred: false, count: 4 };
    let starred = unstarred.toggled();
    assert_eq!(starred, StarState { starred: true, count: 5 });
    assert_eq!(starred.toggled(), unstarred);
    assert_eq!(StarState { starred: true, count: 0 }.toggled().count, 0);
}

#[test]
fn render_markdown_html_formats_and_strips_raw_html() {
    let html = render_markdown_html("# Title\n\n**bold** <script>alert(1)</script>");
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<strong>bold</strong>"));
    assert!(!html.contains("<script>"));
}

#[test]
fn random_step_stays_in_range() {
    assert!(random_step() <= 9);
}

#[test]
fn copy_outcome_reports_failure_when_nothing_was_copied() {
    assert_eq!(copy_outcome(true, Text::LinkCopied), Text::LinkCopied);
    assert_eq!(copy_outcome(true, Text::Copied), Text::Copied);
    assert_eq!(copy_outcome(false, Text::Copied), Text::CopyFailed);
}
