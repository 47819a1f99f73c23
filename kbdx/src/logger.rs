// SPDX-License-Identifier: LGPL-3.0-only

//! Hierarchical line logger.
//!
//! A root logger owns the output, child loggers prefix their lines with the
//! names of all their ancestors:
//!
//! ```text
//! root > rewriter#abc.pdf > page#1: Started
//! ```
//!
//! All loggers of one tree share the options and a single lock around the
//! output, so lines written from different threads never interleave.
//! Output is buffered until [`Logger::flush`].
//!
//! A [`Logger`] also implements [`log::Log`] and can be installed as the
//! global logger with [`Logger::install`].

use std::fmt;
use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Delimiters shared by a logger tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerOptions {
    /// Written between logger names, `" > "` by default.
    pub delimiter: Box<str>,
    /// Written between the last name and the text, `": "` by default.
    pub separator: Box<str>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            delimiter: Box::from(" > "),
            separator: Box::from(": "),
        }
    }
}

type Output = BufWriter<Box<dyn Write + Send>>;

struct Root {
    options: RwLock<LoggerOptions>,
    print_time: AtomicBool,
    out: Mutex<Output>,
}

/// A node of a logger tree.
///
/// Cloning a logger is cheap, clones write to the same output.
#[derive(Clone)]
pub struct Logger {
    root: Arc<Root>,
    path: Arc<[Box<str>]>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Logger")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Creates a root logger writing to stdout.
    pub fn root(name: &str) -> Self {
        Self::with_writer(name, io::stdout())
    }

    /// Creates a root logger writing to `out`.
    pub fn with_writer<W: Write + Send + 'static>(name: &str, out: W) -> Self {
        let out: Box<dyn Write + Send> = Box::new(out);
        Self {
            root: Arc::new(Root {
                options: RwLock::new(LoggerOptions::default()),
                print_time: AtomicBool::new(false),
                out: Mutex::new(BufWriter::new(out)),
            }),
            path: Arc::from(vec![Box::from(name)]),
        }
    }

    /// Creates a child logger.
    pub fn child(&self, name: &str) -> Self {
        let mut path = self.path.to_vec();
        path.push(Box::from(name));
        Self {
            root: self.root.clone(),
            path: path.into(),
        }
    }

    /// Returns the name of this logger.
    pub fn name(&self) -> &str {
        self.path.last().map_or("", |s| &**s)
    }

    /// Returns `true` if this logger has no parent.
    pub fn is_root(&self) -> bool {
        self.path.len() == 1
    }

    /// Returns a copy of the current options.
    pub fn options(&self) -> LoggerOptions {
        self.root
            .options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the options of the whole tree.
    pub fn set_options(&self, options: LoggerOptions) {
        *self
            .root
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner) = options;
    }

    /// Enables local timestamps for records received through [`log::Log`].
    pub fn set_print_time(&self, print_time: bool) {
        self.root.print_time.store(print_time, Ordering::Relaxed);
    }

    fn line(&self, text: fmt::Arguments) -> String {
        let options = self.options();
        let mut line = String::new();
        for (i, name) in self.path.iter().enumerate() {
            if i != 0 {
                line.push_str(&options.delimiter);
            }
            line.push_str(name);
        }
        line.push_str(&options.separator);
        fmt::write(&mut line, text).ok();
        line.push('\n');
        line
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Output> {
        self.root.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes a line prefixed with the names of this logger and its ancestors.
    pub fn println<T: fmt::Display>(&self, text: T) -> io::Result<()> {
        let line = self.line(format_args!("{}", text));
        self.lock().write_all(line.as_bytes())
    }

    /// Flushes the shared output.
    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    /// Installs this logger as the global [`log`] logger.
    pub fn install(&self, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        #[cfg(feature = "logtime")]
        if self.root.print_time.load(Ordering::Relaxed) {
            let dt = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            let line = self.line(format_args!("[{}] {} - {}", dt, record.level(), record.args()));
            let mut out = self.lock();
            out.write_all(line.as_bytes()).and_then(|_| out.flush()).ok();
            return;
        }

        let line = self.line(format_args!("{} - {}", record.level(), record.args()));
        let mut out = self.lock();
        out.write_all(line.as_bytes()).and_then(|_| out.flush()).ok();
    }

    fn flush(&self) {
        Logger::flush(self).ok();
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use log::Log;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prefixes() -> io::Result<()> {
        let buf = Buffer::default();
        let root = Logger::with_writer("root", buf.clone());
        let rewriter = root.child("rewriter#abc.pdf");
        let page = rewriter.child("page#1");

        root.println("ready")?;
        page.println("Started")?;
        rewriter.println(format_args!("{} pages", 3))?;
        assert_eq!(buf.text(), "", "output is buffered");

        page.flush()?;
        assert_eq!(
            buf.text(),
            "root: ready\n\
             root > rewriter#abc.pdf > page#1: Started\n\
             root > rewriter#abc.pdf: 3 pages\n"
        );
        assert!(root.is_root());
        assert!(!page.is_root());
        assert_eq!(page.name(), "page#1");
        Ok(())
    }

    #[test]
    fn shared_options() -> io::Result<()> {
        let buf = Buffer::default();
        let root = Logger::with_writer("a", buf.clone());
        let child = root.child("b");
        assert_eq!(child.options(), LoggerOptions::default());

        child.set_options(LoggerOptions {
            delimiter: Box::from("/"),
            separator: Box::from(" | "),
        });
        root.println("x")?;
        child.child("c").println("y")?;
        root.flush()?;
        assert_eq!(buf.text(), "a | x\na/b/c | y\n");
        Ok(())
    }

    #[test]
    fn threads() {
        let buf = Buffer::default();
        let root = Logger::with_writer("root", buf.clone());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let logger = root.child(&format!("worker{}", i));
                thread::spawn(move || {
                    for j in 0..50 {
                        logger.println(j).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        root.flush().unwrap();

        let text = buf.text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 400);
        for line in lines {
            let (prefix, n) = line.split_once(": ").unwrap();
            assert!(prefix.starts_with("root > worker"));
            assert!(n.parse::<u32>().unwrap() < 50);
        }
    }

    #[test]
    fn log_records() {
        let buf = Buffer::default();
        let logger = Logger::with_writer("kbdx", buf.clone()).child("parse");
        logger.log(
            &Record::builder()
                .args(format_args!("unknown unit {}", "x"))
                .level(log::Level::Warn)
                .build(),
        );
        assert_eq!(buf.text(), "kbdx > parse: WARN - unknown unit x\n");
    }

    #[test]
    fn install_global() {
        let buf = Buffer::default();
        let logger = Logger::with_writer("kbdx", buf.clone());
        logger.install(LevelFilter::Warn).unwrap();
        log::warn!("installed");
        log::info!("filtered");
        assert_eq!(buf.text(), "kbdx: WARN - installed\n");
        assert!(logger.install(LevelFilter::Warn).is_err());
    }
}
