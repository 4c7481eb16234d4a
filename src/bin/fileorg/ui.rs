use indicatif::{ProgressBar, ProgressStyle};
use nu_ansi_term::{Color, Style};
use std::fmt::Display;
use std::io::IsTerminal;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Theme {
    Auto,
    Light,
    Dark,
    Plain,
}

/// Terminal presenter for simulation output. Paints only when stdout is a TTY.
pub struct Ui {
    palette: Palette,
    paint: bool,
    quiet: bool,
}

impl Ui {
    pub fn new(theme: Theme, quiet: bool) -> Self {
        let paint = theme != Theme::Plain && !quiet && std::io::stdout().is_terminal();

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self {
            palette: Palette::for_theme(theme),
            paint,
            quiet,
        }
    }

    fn styled(&self, style: Style, text: &str) -> String {
        if self.paint {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(&self, title: &str) {
        if self.quiet {
            println!("{title}");
        } else {
            println!("{}", self.styled(self.palette.heading, &format!("▸ {title}")));
        }
    }

    /// Key/value block with right-aligned keys.
    pub fn section<'a, I, V>(&self, title: &str, rows: I)
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Display,
    {
        let rows: Vec<(&str, String)> = rows
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        if rows.is_empty() {
            return;
        }
        self.heading(title);
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in rows {
            let key = self.styled(self.palette.key, &format!("{key:>width$}:"));
            println!("  {key} {value}");
        }
    }

    /// Pre-rendered table; the first line is treated as the header.
    pub fn table(&self, title: &str, rendered: &str) {
        self.heading(title);
        let mut lines = rendered.lines();
        if let Some(header) = lines.next() {
            println!("  {}", self.styled(self.palette.key, header));
        }
        for line in lines {
            println!("  {line}");
        }
    }

    pub fn notes<I>(&self, title: &str, entries: I)
    where
        I: IntoIterator<Item = String>,
    {
        let entries: Vec<String> = entries.into_iter().collect();
        if entries.is_empty() {
            return;
        }
        self.heading(title);
        let bullet = if self.paint { "•" } else { "-" };
        for entry in entries {
            println!("  {} {entry}", self.styled(self.palette.accent, bullet));
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            println!("{message}");
        } else {
            println!("{} {message}", self.styled(self.palette.success, "✔"));
        }
    }

    pub fn warn(&self, message: &str) {
        if self.quiet {
            eprintln!("{message}");
        } else {
            eprintln!("{} {message}", self.styled(self.palette.warn, "⚠"));
        }
    }

    /// Starts a spinner for a long step; dropping the guard unfinished reports failure.
    pub fn task(&self, label: impl Into<String>) -> Task<'_> {
        let label = label.into();
        let spinner = (!self.quiet).then(|| {
            let style = ProgressStyle::with_template("{prefix} {spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let pb = ProgressBar::new_spinner().with_style(style);
            pb.set_prefix(self.styled(self.palette.accent, "▶"));
            pb.set_message(label.clone());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        Task {
            ui: self,
            label,
            start: Instant::now(),
            spinner,
            done: false,
        }
    }
}

pub struct Task<'a> {
    ui: &'a Ui,
    label: String,
    start: Instant,
    spinner: Option<ProgressBar>,
    done: bool,
}

impl Task<'_> {
    pub fn finish(mut self) -> Duration {
        self.done = true;
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
        self.start.elapsed()
    }
}

impl Drop for Task<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let message = format!(
            "{} failed after {}",
            self.label,
            format_duration(self.start.elapsed())
        );
        match self.spinner.take() {
            Some(pb) => pb.abandon_with_message(message),
            None => self.ui.warn(&message),
        }
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.0}ms", secs * 1_000.0)
    }
}

#[derive(Clone, Copy)]
struct Palette {
    heading: Style,
    key: Style,
    accent: Style,
    success: Style,
    warn: Style,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                heading: Color::Blue.bold(),
                key: Color::Black.bold(),
                accent: Color::Purple.normal(),
                success: Color::Green.bold(),
                warn: Color::Red.bold(),
            },
            Theme::Auto | Theme::Dark => Self {
                heading: Color::Purple.bold(),
                key: Color::LightBlue.bold(),
                accent: Color::LightCyan.normal(),
                success: Color::LightGreen.bold(),
                warn: Color::Yellow.bold(),
            },
            Theme::Plain => Self {
                heading: Style::new(),
                key: Style::new(),
                accent: Style::new(),
                success: Style::new(),
                warn: Style::new(),
            },
        }
    }
}
