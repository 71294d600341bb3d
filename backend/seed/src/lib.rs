//! # Seeding
//!
//! Resets collections to the sample data shipped in `catalog::fixtures`.
//!
//! ## Steps
//! 1. Clear every targeted collection, the whole hash goes in one `DEL`.
//! 2. Insert the samples one by one with `insert_new`, so a stray id collision aborts the run.
//! 3. Print how many documents each collection holds afterwards.
//!
//! Sample timestamps are all derived from a single `now`, tasks one second apart so the
//! newest-first listing order is stable.
use std::{fmt, str::FromStr};

use anyhow::Result;
use catalog::{BOOKS, TASKS, fixtures};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use server::database::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Books,
    Tasks,
    All,
}

impl Collection {
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Books => &[BOOKS],
            Self::Tasks => &[TASKS],
            Self::All => &[BOOKS, TASKS],
        }
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" => Ok(Self::Books),
            "tasks" => Ok(Self::Tasks),
            "all" => Ok(Self::All),
            other => Err(format!("unknown collection '{other}', expected books, tasks or all")),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Books => "books",
            Self::Tasks => "tasks",
            Self::All => "all",
        })
    }
}

/// Documents present per collection once seeding finished.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub books: Option<usize>,
    pub tasks: Option<usize>,
}

pub async fn reseed(store: &Store, collection: Collection, now: DateTime<Utc>) -> Result<Summary> {
    for name in collection.names() {
        store.clear(name).await?;
        println!("Cleared {name}");
    }

    let books = match collection {
        Collection::Books | Collection::All => fixtures::sample_books(now),
        Collection::Tasks => Vec::new(),
    };
    let tasks = match collection {
        Collection::Tasks | Collection::All => fixtures::sample_tasks(now),
        Collection::Books => Vec::new(),
    };

    let pb = ProgressBar::new((books.len() + tasks.len()) as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for book in &books {
        pb.set_message(format!("Inserting book {}", book.id));
        store.insert_new(BOOKS, &book.id, book).await?;

        #[cfg(feature = "verbose")]
        println!("Inserted book: {}", book.title);

        pb.inc(1);
    }

    for task in &tasks {
        pb.set_message(format!("Inserting task {}", task.task_name));
        store.insert_new(TASKS, &task.id.to_string(), task).await?;

        #[cfg(feature = "verbose")]
        println!("Inserted task: {}", task.task_name);

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    let mut summary = Summary::default();
    for name in collection.names() {
        let count = store.count(name).await?;
        println!("{name}: {count} documents");

        if *name == BOOKS {
            summary.books = Some(count);
        } else {
            summary.tasks = Some(count);
        }
    }

    Ok(summary)
}
