//! The transactions table and the statistics cards.

use maud::{Markup, html};

use crate::{
    html::{
        NOT_SOLD_BADGE_STYLE, SOLD_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
    statistics::Statistics,
    transaction::TransactionRecord,
};

const STAT_CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg shadow \
    bg-white dark:bg-gray-800";
const STAT_LABEL_STYLE: &str = "text-sm text-gray-500 dark:text-gray-400";
const STAT_VALUE_STYLE: &str = "text-2xl font-bold";

/// Renders the sale totals as a row of cards.
pub(super) fn statistics_cards(statistics: &Statistics) -> Markup {
    let cards = [
        ("total-sale-amount", "Total sale", format_currency(statistics.total_sale_amount)),
        ("total-sold-items", "Sold items", statistics.total_sold_items.to_string()),
        (
            "total-not-sold-items",
            "Not sold items",
            statistics.total_not_sold_items.to_string(),
        ),
    ];

    html! {
        section id="statistics" class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-4" {
            @for (id, label, value) in cards {
                div id=(id) class=(STAT_CARD_STYLE) {
                    span class=(STAT_LABEL_STYLE) { (label) }
                    span class=(STAT_VALUE_STYLE) { (value) }
                }
            }
        }
    }
}

/// Renders a table with one row per transaction.
pub(super) fn transactions_table(transactions: &[TransactionRecord]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow" {
            table id="transactions" class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEADER_STYLE) {
                    tr {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Sold" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date of Sale" }
                    }
                }
                tbody {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE) {
                            td class=(TABLE_CELL_STYLE) { (transaction.id) }
                            td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                (transaction.title)
                            }
                            td class={(TABLE_CELL_STYLE) " max-w-md truncate"} title=(transaction.description) {
                                (transaction.description)
                            }
                            td class={(TABLE_CELL_STYLE) " text-right whitespace-nowrap"} {
                                (format_currency(transaction.price))
                            }
                            td class=(TABLE_CELL_STYLE) {
                                (transaction.category.as_deref().unwrap_or("-"))
                            }
                            td class=(TABLE_CELL_STYLE) {
                                @if transaction.is_sold {
                                    span class=(SOLD_BADGE_STYLE) { "Sold" }
                                } @else {
                                    span class=(NOT_SOLD_BADGE_STYLE) { "Not sold" }
                                }
                            }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} {
                                (transaction.date_of_sale.date())
                            }
                        }
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE) {
                            td colspan="7" class={(TABLE_CELL_STYLE) " text-center"} {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}
