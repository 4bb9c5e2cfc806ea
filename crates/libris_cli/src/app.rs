//! Blocking request/render loop driving the catalog service.
//!
//! # Invariants
//! - One command is read, executed to completion and rendered before the next.
//! - The store is closed exactly once when the loop ends, whatever the cause:
//!   confirmed exit, closed input or a Ctrl+C interrupt.

use crate::console::is_user_interrupt;
use crate::view::ConsoleView;
use libris_core::{AddOutcome, CatalogService, CatalogStore};
use log::{info, warn};
use std::io::{self, BufRead, Write};

/// Main menu selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Books,
    Magazines,
    Exit,
}

impl MainCommand {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::Books),
            "2" => Some(Self::Magazines),
            "0" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Book/magazine submenu selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCommand {
    List,
    Add,
    Search,
    Back,
}

impl ItemCommand {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::List),
            "2" => Some(Self::Add),
            "3" => Some(Self::Search),
            "0" => Some(Self::Back),
            _ => None,
        }
    }
}

pub struct App<S: CatalogStore, R, W> {
    service: CatalogService<S>,
    view: ConsoleView<R, W>,
}

impl<S: CatalogStore, R: BufRead, W: Write> App<S, R, W> {
    pub fn new(service: CatalogService<S>, view: ConsoleView<R, W>) -> Self {
        Self { service, view }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (CatalogService<S>, ConsoleView<R, W>) {
        (self.service, self.view)
    }

    /// Runs until the user confirms exit or input ends.
    ///
    /// # Errors
    /// - Console I/O failures other than end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let result = match self.drive() {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                warn!("event=app_interrupted module=cli status=ok reason=input_closed");
                // Why: the console may already be gone, so a failed notice is ignored.
                let _ = self.view.show_info("Input closed, exiting.");
                Ok(())
            }
            Err(err) if is_user_interrupt(&err) => {
                warn!("event=app_interrupted module=cli status=ok reason=user_interrupt");
                let _ = self.view.show_info("Program stopped by user (Ctrl+C).");
                Ok(())
            }
            other => other,
        };
        self.service.close();
        info!("event=app_stop module=cli status={}", status_label(&result));
        result
    }

    fn drive(&mut self) -> io::Result<()> {
        self.view.show_header()?;
        loop {
            self.view.show_main_menu()?;
            let choice = self.view.get_input("Select menu: ")?;
            match MainCommand::parse(&choice) {
                Some(MainCommand::Books) => self.book_menu()?,
                Some(MainCommand::Magazines) => self.magazine_menu()?,
                Some(MainCommand::Exit) => {
                    if self.view.confirm("Are you sure you want to exit?")? {
                        self.view
                            .show_info("Thank you for using the library catalog!")?;
                        return Ok(());
                    }
                }
                None => self.view.show_error("Invalid choice!")?,
            }
        }
    }

    fn book_menu(&mut self) -> io::Result<()> {
        loop {
            self.view.show_book_menu()?;
            let choice = self.view.get_input("Select menu: ")?;
            match ItemCommand::parse(&choice) {
                Some(ItemCommand::List) => self.list_books()?,
                Some(ItemCommand::Add) => self.add_book()?,
                Some(ItemCommand::Search) => self.search_books()?,
                Some(ItemCommand::Back) => return Ok(()),
                None => self.view.show_error("Invalid choice!")?,
            }
            self.view.pause()?;
        }
    }

    fn magazine_menu(&mut self) -> io::Result<()> {
        loop {
            self.view.show_magazine_menu()?;
            let choice = self.view.get_input("Select menu: ")?;
            match ItemCommand::parse(&choice) {
                Some(ItemCommand::List) => self.list_magazines()?,
                Some(ItemCommand::Add) => self.add_magazine()?,
                Some(ItemCommand::Search) => self.search_magazines()?,
                Some(ItemCommand::Back) => return Ok(()),
                None => self.view.show_error("Invalid choice!")?,
            }
            self.view.pause()?;
        }
    }

    fn list_books(&mut self) -> io::Result<()> {
        match self.service.list_books() {
            Ok(books) if books.is_empty() => self.view.show_info("No books in the catalog yet."),
            Ok(books) => self.view.display_items(&books, "BOOK LIST"),
            Err(err) => self.view.show_error(&format!("Could not load books: {err}")),
        }
    }

    fn add_book(&mut self) -> io::Result<()> {
        let input = self.view.get_book_input()?;
        match self.service.add_book(
            &input.title,
            &input.author,
            input.year,
            input.isbn.as_deref(),
        ) {
            Ok(AddOutcome::Added(_)) => self.view.show_success("Book added successfully!"),
            Ok(AddOutcome::Failed) => self.view.show_error("Failed to add book!"),
            Err(err) => self.view.show_error(&format!("Invalid book: {err}")),
        }
    }

    fn search_books(&mut self) -> io::Result<()> {
        let Some(keyword) = self.view.get_search_keyword()? else {
            return Ok(());
        };
        match self.service.search_books(&keyword) {
            Ok(books) if books.is_empty() => self
                .view
                .show_info(&format!("No books found for keyword '{keyword}'")),
            Ok(books) => self
                .view
                .display_items(&books, &format!("SEARCH RESULTS: '{keyword}'")),
            Err(err) => self.view.show_error(&format!("Search failed: {err}")),
        }
    }

    fn list_magazines(&mut self) -> io::Result<()> {
        match self.service.list_magazines() {
            Ok(magazines) if magazines.is_empty() => {
                self.view.show_info("No magazines in the catalog yet.")
            }
            Ok(magazines) => self.view.display_items(&magazines, "MAGAZINE LIST"),
            Err(err) => self
                .view
                .show_error(&format!("Could not load magazines: {err}")),
        }
    }

    fn add_magazine(&mut self) -> io::Result<()> {
        let input = self.view.get_magazine_input()?;
        match self.service.add_magazine(
            &input.title,
            input.publisher.as_deref(),
            input.issue_number,
        ) {
            Ok(AddOutcome::Added(_)) => self.view.show_success("Magazine added successfully!"),
            Ok(AddOutcome::Failed) => self.view.show_error("Failed to add magazine!"),
            Err(err) => self.view.show_error(&format!("Invalid magazine: {err}")),
        }
    }

    fn search_magazines(&mut self) -> io::Result<()> {
        let Some(keyword) = self.view.get_search_keyword()? else {
            return Ok(());
        };
        match self.service.search_magazines(&keyword) {
            Ok(magazines) if magazines.is_empty() => self
                .view
                .show_info(&format!("No magazines found for keyword '{keyword}'")),
            Ok(magazines) => self
                .view
                .display_items(&magazines, &format!("SEARCH RESULTS: '{keyword}'")),
            Err(err) => self.view.show_error(&format!("Search failed: {err}")),
        }
    }
}

fn status_label(result: &io::Result<()>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}
