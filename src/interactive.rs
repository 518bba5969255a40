//! Interactive prompts collecting one search request

use anyhow::Result;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::application::search::{SearchParameters, SearchRequest};
use crate::domain::variant::ListingCategory;
use crate::infrastructure::export::OutputSelection;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Empty or all ASCII digits
pub fn validate_optional_number(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("Enter digits only, or leave empty to skip".to_string())
    }
}

pub fn validate_page_count(pages: u32, max_pages: u32) -> Result<(), String> {
    if (1..=max_pages).contains(&pages) {
        Ok(())
    } else {
        Err(format!("Enter a number between 1 and {max_pages}"))
    }
}

pub fn validate_output_format(input: &str) -> Result<(), String> {
    if OutputSelection::parse(input).is_empty() {
        Err("Please choose 'csv', 'json', or 'both'".to_string())
    } else {
        Ok(())
    }
}

fn optional_text(theme: &ColorfulTheme, prompt: &str) -> Result<Option<String>> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(optional(value))
}

fn optional_number(theme: &ColorfulTheme, prompt: &str) -> Result<Option<String>> {
    let value: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|input: &String| validate_optional_number(input))
        .interact_text()?;
    Ok(optional(value))
}

/// Ask for category, filters, page count and output formats
pub fn collect_request(max_pages: u32) -> Result<SearchRequest> {
    let theme = ColorfulTheme::default();
    let categories = ListingCategory::all();
    let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();

    let choice = Select::with_theme(&theme)
        .with_prompt("What do you want to search for?")
        .items(&labels)
        .default(0)
        .interact()?;
    let category = categories[choice];

    let mut params = SearchParameters::default();
    if category.uses_vehicle_filters() {
        params.brand = optional_text(&theme, "Brand (or press Enter to skip)")?;
        params.model = optional_text(&theme, "Model (or press Enter to skip)")?;
        params.year_from = optional_number(&theme, "Starting year (or press Enter to skip)")?;
        params.year_to = optional_number(&theme, "Ending year (or press Enter to skip)")?;
    }
    params.price_min = optional_number(&theme, "Minimum price (or press Enter to skip)")?;
    params.price_max = optional_number(&theme, "Maximum price (or press Enter to skip)")?;

    let requested_pages: u32 = Input::with_theme(&theme)
        .with_prompt(format!("Number of pages to scrape (max {max_pages})"))
        .default(1)
        .validate_with(|pages: &u32| validate_page_count(*pages, max_pages))
        .interact_text()?;

    let formats: String = Input::with_theme(&theme)
        .with_prompt("Output formats (csv, json, or both)")
        .default("both".to_string())
        .validate_with(|input: &String| validate_output_format(input))
        .interact_text()?;

    Ok(SearchRequest {
        category,
        params,
        requested_pages,
        output: OutputSelection::parse(&formats),
    })
}
