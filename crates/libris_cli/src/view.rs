//! Console presentation: menus, prompts and list rendering.
//!
//! # Responsibility
//! - Render menus and results; collect and validate raw console input.
//! - Re-prompt on malformed input so only well-formed values leave the view.
//!
//! # Invariants
//! - No catalog logic lives here; the view only talks to its reader and writer.
//! - End of input surfaces as `io::ErrorKind::UnexpectedEof`.

use libris_core::CatalogItem;
use std::io::{self, BufRead, Write};

const WIDTH: usize = 50;

/// Field values for a new book, already checked for presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub year: Option<i64>,
    pub isbn: Option<String>,
}

/// Field values for a new magazine, already checked for presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagazineInput {
    pub title: String,
    pub publisher: Option<String>,
    pub issue_number: Option<i64>,
}

pub struct ConsoleView<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleView<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn show_header(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "=".repeat(WIDTH))?;
        writeln!(self.output, "{:^WIDTH$}", "LIBRARY CATALOG")?;
        writeln!(self.output, "{}", "=".repeat(WIDTH))?;
        writeln!(self.output)
    }

    pub fn show_main_menu(&mut self) -> io::Result<()> {
        self.show_menu(
            "MAIN MENU:",
            &["1. Manage Books", "2. Manage Magazines", "0. Exit"],
        )
    }

    pub fn show_book_menu(&mut self) -> io::Result<()> {
        self.show_menu(
            "BOOK MENU:",
            &[
                "1. Show All Books",
                "2. Add New Book",
                "3. Search Books",
                "0. Back to Main Menu",
            ],
        )
    }

    pub fn show_magazine_menu(&mut self) -> io::Result<()> {
        self.show_menu(
            "MAGAZINE MENU:",
            &[
                "1. Show All Magazines",
                "2. Add New Magazine",
                "3. Search Magazines",
                "0. Back to Main Menu",
            ],
        )
    }

    /// Prints `prompt` and returns the next trimmed line.
    pub fn get_input(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Reads an optional positive number; blank input skips the field.
    pub fn get_number_input(&mut self, prompt: &str) -> io::Result<Option<i64>> {
        loop {
            let value = self.get_input(prompt)?;
            if value.is_empty() {
                return Ok(None);
            }
            match value.parse::<i64>() {
                Ok(number) if number > 0 => return Ok(Some(number)),
                Ok(_) => self.show_error("Number must be greater than zero!")?,
                Err(_) => self.show_error("Input must be a number!")?,
            }
        }
    }

    pub fn get_book_input(&mut self) -> io::Result<BookInput> {
        self.show_section("ADD NEW BOOK")?;
        let title = self.get_required_input("Book Title: ", "Title cannot be empty!")?;
        let author = self.get_required_input("Author: ", "Author cannot be empty!")?;
        let year = self.get_number_input("Publication Year (Enter to skip): ")?;
        let isbn = self.get_optional_input("ISBN (Enter to skip): ")?;

        Ok(BookInput {
            title,
            author,
            year,
            isbn,
        })
    }

    pub fn get_magazine_input(&mut self) -> io::Result<MagazineInput> {
        self.show_section("ADD NEW MAGAZINE")?;
        let title = self.get_required_input("Magazine Title: ", "Title cannot be empty!")?;
        let publisher = self.get_optional_input("Publisher (Enter to skip): ")?;
        let issue_number = self.get_number_input("Issue Number (Enter to skip): ")?;

        Ok(MagazineInput {
            title,
            publisher,
            issue_number,
        })
    }

    /// Returns `None` (after telling the user) when the keyword is blank.
    pub fn get_search_keyword(&mut self) -> io::Result<Option<String>> {
        let keyword = self.get_input("\nEnter search keyword: ")?;
        if keyword.is_empty() {
            self.show_error("Search keyword cannot be empty!")?;
            return Ok(None);
        }
        Ok(Some(keyword))
    }

    pub fn display_items<T: CatalogItem>(&mut self, items: &[T], heading: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", "=".repeat(WIDTH))?;
        writeln!(self.output, "{:=^WIDTH$}", format!(" {heading} "))?;
        writeln!(self.output, "{}", "=".repeat(WIDTH))?;

        if items.is_empty() {
            writeln!(self.output, "No data.")?;
        }
        for item in items {
            writeln!(self.output, "{}", item.display_info())?;
            writeln!(self.output, "{}", "-".repeat(WIDTH))?;
        }

        writeln!(self.output, "Total: {} item(s)", items.len())
    }

    pub fn show_success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "\n[OK] {message}")
    }

    pub fn show_error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "\n[ERROR] {message}")
    }

    pub fn show_info(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "\n[INFO] {message}")
    }

    pub fn pause(&mut self) -> io::Result<()> {
        self.get_input("\nPress Enter to continue...").map(|_| ())
    }

    /// Yes/no question; only `y` (any case) confirms.
    pub fn confirm(&mut self, message: &str) -> io::Result<bool> {
        let response = self.get_input(&format!("\n{message} (y/n): "))?;
        Ok(response.eq_ignore_ascii_case("y"))
    }

    fn show_menu(&mut self, title: &str, entries: &[&str]) -> io::Result<()> {
        writeln!(self.output, "\n{}", "-".repeat(WIDTH))?;
        writeln!(self.output, "{title}")?;
        for entry in entries {
            writeln!(self.output, "{entry}")?;
        }
        writeln!(self.output, "{}", "-".repeat(WIDTH))
    }

    fn show_section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", "-".repeat(WIDTH))?;
        writeln!(self.output, "{title}")?;
        writeln!(self.output, "{}", "-".repeat(WIDTH))
    }

    fn get_required_input(&mut self, prompt: &str, empty_message: &str) -> io::Result<String> {
        loop {
            let value = self.get_input(prompt)?;
            if !value.is_empty() {
                return Ok(value);
            }
            self.show_error(empty_message)?;
        }
    }

    fn get_optional_input(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let value = self.get_input(prompt)?;
        Ok((!value.is_empty()).then_some(value))
    }
}
