use parking_lot::Mutex;

/// Destination for shell output. Informational and warning lines stay distinct so
/// front ends can route them to different streams.
pub trait OutputSink: Send + Sync {
    fn info(&self, line: &str);
    fn warn(&self, line: &str);
}

/// Writes info lines to stdout and warnings to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn info(&self, line: &str) {
        println!("{}", line);
    }

    fn warn(&self, line: &str) {
        eprintln!("[WARNING] {}", line);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Collects output in memory.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    lines: Mutex<Vec<(Level, String)>>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.filtered(Level::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.filtered(Level::Warn)
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }

    fn filtered(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl OutputSink for BufferedOutput {
    fn info(&self, line: &str) {
        self.lines.lock().push((Level::Info, line.to_string()));
    }

    fn warn(&self, line: &str) {
        self.lines.lock().push((Level::Warn, line.to_string()));
    }
}
