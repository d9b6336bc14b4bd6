//! The terminal writer used by every command.
//!
//! Stream discipline: results go to `out`; warnings and error text go to `err`; the
//! `OK`/`FAILED` marker always goes to `out` as the last thing a command prints, so
//! scripts reading stdout are not disturbed by diagnostic text.

use crate::table::format_rows;
use crate::{render_with_color, rgb_to_ansi256, Theme, Translator};
use console::Style;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::{Arc, Mutex};

/// An error (or any message) that can render itself in the user's locale.
pub trait Translatable {
    fn translate(&self, translator: &Translator) -> String;
}

/// Placeholder data: `("app_name", "dora")` pairs.
pub type Data<'a> = [(&'a str, &'a str)];

fn data_map<'a>(data: &'a Data<'a>) -> BTreeMap<&'a str, &'a str> {
    data.iter().copied().collect()
}

fn cf_theme(use_color: bool) -> Theme {
    let style = |s: Style| if use_color { s.force_styling(true) } else { s };
    Theme::new()
        .add("success", style(Style::new().green().bold()))
        .add("failure", style(Style::new().red().bold()))
        .add("header", style(Style::new().bold()))
        .add("flavor", style(Style::new().cyan().bold()))
        .add("key", style(Style::new().bold()))
        .add("log_header", style(Style::new().color256(rgb_to_ansi256((154, 154, 154)))))
        .add("log_err", style(Style::new().red()))
}

/// Writes command output to a pair of streams with translation and styling applied.
pub struct Ui {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    input: Box<dyn BufRead + Send>,
    translator: Translator,
    theme: Theme,
    use_color: bool,
}

impl Ui {
    /// A UI bound to the process's stdin, stdout and stderr.
    pub fn new(translator: Translator, use_color: bool) -> Self {
        Self::with_streams(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            Box::new(BufReader::new(io::stdin())),
            translator,
            use_color,
        )
    }

    pub fn with_streams(
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
        input: Box<dyn BufRead + Send>,
        translator: Translator,
        use_color: bool,
    ) -> Self {
        Self {
            out,
            err,
            input,
            theme: cf_theme(use_color),
            translator,
            use_color,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn translate_text(&self, template: &str, data: &Data) -> String {
        self.translator.translate(template, &data_map(data))
    }

    fn paint(&self, style: &str, text: &str) -> String {
        self.theme.paint(style, text, self.use_color)
    }

    pub fn display_text(&mut self, template: &str, data: &Data) -> io::Result<()> {
        let text = self.translate_text(template, data);
        writeln!(self.out, "{}", text)
    }

    /// Like [`Ui::display_text`] with every substituted value highlighted.
    pub fn display_text_with_flavor(&mut self, template: &str, data: &Data) -> io::Result<()> {
        let flavored: Vec<(String, String)> = data
            .iter()
            .map(|(k, v)| (k.to_string(), self.paint("flavor", v)))
            .collect();
        let map: BTreeMap<&str, &str> = flavored
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let text = self.translator.translate(template, &map);
        writeln!(self.out, "{}", text)
    }

    pub fn display_header(&mut self, template: &str) -> io::Result<()> {
        let text = self.paint("header", &self.translator.translate_text(template));
        writeln!(self.out, "{}", text)
    }

    pub fn display_new_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn display_ok(&mut self) -> io::Result<()> {
        let ok = self.translator.translate_text("OK");
        let line = self.render_marker("success", &ok);
        writeln!(self.out, "{}", line)
    }

    fn render_marker(&self, style: &str, text: &str) -> String {
        let template = format!("{{{{ marker | style(\"{}\") }}}}", style);
        render_with_color(
            &template,
            &BTreeMap::from([("marker", text)]),
            &self.theme,
            self.use_color,
        )
        .unwrap_or_else(|_| text.to_string())
    }

    pub fn display_warning(&mut self, template: &str, data: &Data) -> io::Result<()> {
        let text = self.translate_text(template, data);
        writeln!(self.err, "{}", text)
    }

    /// Prints API warnings verbatim (they are server text, never templates).
    pub fn display_warnings<S: AsRef<str>>(&mut self, warnings: &[S]) -> io::Result<()> {
        for warning in warnings {
            writeln!(self.err, "{}", warning.as_ref())?;
        }
        Ok(())
    }

    /// Translated error text on stderr, then `FAILED` on stdout.
    pub fn display_error(&mut self, error: &dyn Translatable) -> io::Result<()> {
        let message = error.translate(&self.translator);
        writeln!(self.err, "{}", message)?;
        let failed = self.translator.translate_text("FAILED");
        let line = self.render_marker("failure", &failed);
        writeln!(self.out, "{}", line)
    }

    pub fn display_key_value_table(
        &mut self,
        prefix: &str,
        rows: &[(String, String)],
        padding: usize,
    ) -> io::Result<()> {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|(key, value)| {
                let key = self.translator.translate_text(key);
                vec![self.paint("key", &key), value.clone()]
            })
            .collect();
        for line in format_rows(prefix, &cells, padding) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// First row is the header and is translated and bolded.
    pub fn display_table_with_header(
        &mut self,
        prefix: &str,
        rows: &[Vec<String>],
        padding: usize,
    ) -> io::Result<()> {
        let mut cells = Vec::with_capacity(rows.len());
        if let Some((header, body)) = rows.split_first() {
            cells.push(
                header
                    .iter()
                    .map(|h| self.paint("header", &self.translator.translate_text(h)))
                    .collect(),
            );
            cells.extend(body.iter().cloned());
        }
        for line in format_rows(prefix, &cells, padding) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// One streamed log line: `   <header> <message>`, stderr lines in red.
    pub fn display_log_line(&mut self, header: &str, message: &str, is_error: bool) -> io::Result<()> {
        let header = self.paint("log_header", header);
        let message = if is_error {
            self.paint("log_err", message)
        } else {
            message.to_string()
        };
        for line in message.lines() {
            writeln!(self.out, "   {} {}", header, line)?;
        }
        Ok(())
    }

    /// Asks a yes/no question on stdout. Empty or unreadable input yields `default`.
    pub fn display_boolean_prompt(
        &mut self,
        default: bool,
        template: &str,
        data: &Data,
    ) -> io::Result<bool> {
        let question = self.translate_text(template, data);
        let hint = if default { "[Yn]" } else { "[yN]" };
        write!(self.out, "{} {}>> ", question, hint)?;
        self.out.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.out)?;
            return Ok(default);
        }
        let answer = answer.trim().to_ascii_lowercase();
        let yes = self.translator.translate_text("yes").to_lowercase();
        Ok(match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            other => other == yes,
        })
    }
}

/// An in-memory writer whose contents can be read back after the [`Ui`] consumed it.
#[derive(Clone, Default)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .0
            .lock()
            .map_err(|_| io::Error::other("buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Ui {
    /// A colorless UI writing into buffers, with `input` as the user's typed answers.
    pub fn buffered(translator: Translator, input: &str) -> (Self, Buffer, Buffer) {
        let out = Buffer::new();
        let err = Buffer::new();
        let ui = Self::with_streams(
            Box::new(out.clone()),
            Box::new(err.clone()),
            Box::new(io::Cursor::new(input.to_string().into_bytes())),
            translator,
            false,
        );
        (ui, out, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Boom;

    impl Translatable for Boom {
        fn translate(&self, translator: &Translator) -> String {
            translator.translate("Space '{{ name }}' not found.", &BTreeMap::from([("name", "dev")]))
        }
    }

    #[test]
    fn error_text_goes_to_stderr_and_failed_to_stdout() {
        let (mut ui, out, err) = Ui::buffered(Translator::default(), "");
        ui.display_warnings(&["warning-1", "warning-2"]).unwrap();
        ui.display_error(&Boom).unwrap();

        assert_eq!(err.contents(), "warning-1\nwarning-2\nSpace 'dev' not found.\n");
        assert_eq!(out.contents(), "FAILED\n");
    }

    #[test]
    fn ok_marker_is_plain_without_color() {
        let (mut ui, out, _) = Ui::buffered(Translator::default(), "");
        ui.display_ok().unwrap();
        assert_eq!(out.contents(), "OK\n");
    }

    #[test]
    fn ok_marker_is_colored_with_color() {
        let out = Buffer::new();
        let mut ui = Ui::with_streams(
            Box::new(out.clone()),
            Box::new(Buffer::new()),
            Box::new(io::empty()),
            Translator::default(),
            true,
        );
        ui.display_ok().unwrap();
        assert!(out.contents().contains("\x1b["));
        assert!(out.contents().contains("OK"));
    }

    #[test]
    fn flavor_text_substitutes_values() {
        let (mut ui, out, _) = Ui::buffered(Translator::default(), "");
        ui.display_text_with_flavor(
            "Getting app {{ app_name }} in org {{ org }}...",
            &[("app_name", "dora"), ("org", "dev")],
        )
        .unwrap();
        assert_eq!(out.contents(), "Getting app dora in org dev...\n");
    }

    #[test]
    fn key_value_table_aligns() {
        let (mut ui, out, _) = Ui::buffered(Translator::default(), "");
        ui.display_key_value_table(
            "",
            &[
                ("name:".to_string(), "dora".to_string()),
                ("routes:".to_string(), "dora.example.com".to_string()),
            ],
            3,
        )
        .unwrap();
        assert_eq!(
            out.contents(),
            "name:     dora\nroutes:   dora.example.com\n"
        );
    }

    #[test]
    fn boolean_prompt_reads_answer() {
        let (mut ui, _, _) = Ui::buffered(Translator::default(), "y\n");
        assert!(ui.display_boolean_prompt(false, "Really?", &[]).unwrap());

        let (mut ui, _, _) = Ui::buffered(Translator::default(), "");
        assert!(!ui.display_boolean_prompt(false, "Really?", &[]).unwrap());
    }

    #[test]
    fn log_lines_are_indented() {
        let (mut ui, out, _) = Ui::buffered(Translator::default(), "");
        ui.display_log_line("2018-01-01T00:00:00.00+0000 [STG/0] OUT", "Staging\ndone", false)
            .unwrap();
        assert_eq!(
            out.contents(),
            "   2018-01-01T00:00:00.00+0000 [STG/0] OUT Staging\n   2018-01-01T00:00:00.00+0000 [STG/0] OUT done\n"
        );
    }
}
