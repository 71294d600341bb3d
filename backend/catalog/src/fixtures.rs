//! Sample documents for fresh stores and the seed tool.
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    book::{Book, CURRENCY},
    task::{Priority, Status, Task},
};

/// (id, title, author, year, genre, summary, price)
const BOOKS: [(&str, &str, &str, i64, &str, &str, &str); 5] = [
    (
        "b1",
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        1925,
        "Classic",
        "A classic American novel set in the Jazz Age, exploring wealth, love, and the American Dream.",
        "29.99",
    ),
    (
        "b2",
        "To Kill a Mockingbird",
        "Harper Lee",
        1960,
        "Classic",
        "A powerful story of racial injustice and childhood innocence in the American South.",
        "22.00",
    ),
    (
        "b3",
        "1984",
        "George Orwell",
        1949,
        "Science Fiction",
        "A dystopian novel depicting a totalitarian society under constant surveillance.",
        "15.50",
    ),
    (
        "b4",
        "The Hobbit",
        "J.R.R. Tolkien",
        1937,
        "Fantasy",
        "Bilbo Baggins is swept into a quest to reclaim a dwarven kingdom from a dragon.",
        "18.75",
    ),
    (
        "b5",
        "Wolf Hall",
        "Hilary Mantel",
        2009,
        "Historical Fiction",
        "Thomas Cromwell rises through the court of Henry VIII in Tudor England.",
        "27.40",
    ),
];

/// (taskName, description, assignedTo, priority, status, estimatedHours, technology)
const TASKS: [(&str, &str, &str, Priority, Status, f64, &str); 8] = [
    (
        "Implement User Authentication",
        "Build JWT-based authentication system with refresh tokens and secure password hashing",
        "Sarah Mitchell",
        Priority::High,
        Status::InProgress,
        16.0,
        "Node.js & JWT",
    ),
    (
        "Design Database Schema",
        "Create normalized database schema for e-commerce platform with proper relationships",
        "David Chen",
        Priority::Critical,
        Status::Completed,
        12.0,
        "MongoDB",
    ),
    (
        "Build REST API Endpoints",
        "Develop RESTful API endpoints for product catalog with pagination and filtering",
        "Emily Rodriguez",
        Priority::High,
        Status::InProgress,
        20.0,
        "Express.js",
    ),
    (
        "Configure CI/CD Pipeline",
        "Set up automated testing and deployment pipeline using GitHub Actions",
        "Michael Brown",
        Priority::Medium,
        Status::ToDo,
        8.0,
        "GitHub Actions",
    ),
    (
        "Create Unit Tests",
        "Write comprehensive unit tests for authentication and API modules",
        "Jessica Lee",
        Priority::High,
        Status::Testing,
        14.0,
        "Jest & Mocha",
    ),
    (
        "Frontend Dashboard Development",
        "Build responsive admin dashboard with data visualization components",
        "Alex Thompson",
        Priority::Medium,
        Status::InProgress,
        24.0,
        "React.js",
    ),
    (
        "API Documentation",
        "Create comprehensive API documentation using Swagger/OpenAPI specification",
        "Chris Wang",
        Priority::Low,
        Status::ToDo,
        6.0,
        "Swagger",
    ),
    (
        "Performance Optimization",
        "Optimize database queries and implement caching for frequently accessed data",
        "Sarah Mitchell",
        Priority::Medium,
        Status::Testing,
        10.0,
        "Redis & MongoDB",
    ),
];

pub fn sample_books(now: DateTime<Utc>) -> Vec<Book> {
    BOOKS
        .iter()
        .map(|&(id, title, author, year, genre, summary, price)| Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            year,
            genre: genre.to_string(),
            summary: summary.to_string(),
            price: price.to_string(),
            currency: CURRENCY.to_string(),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Creation times step back one second per task so listing order is stable.
pub fn sample_tasks(now: DateTime<Utc>) -> Vec<Task> {
    TASKS
        .iter()
        .enumerate()
        .map(
            |(index, &(name, description, assigned_to, priority, status, hours, technology))| Task {
                id: Uuid::new_v4(),
                task_name: name.to_string(),
                description: description.to_string(),
                assigned_to: assigned_to.to_string(),
                priority,
                status,
                estimated_hours: hours,
                technology: technology.to_string(),
                created_at: now - Duration::seconds(index as i64),
            },
        )
        .collect()
}
