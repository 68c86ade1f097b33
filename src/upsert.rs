use chrono::NaiveDate;

/// Ordering applied after a record is appended for a new day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Unsorted,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Replaced(usize),
    Inserted,
}

/// Replaces the record sharing `item`'s calendar day in place, or appends
/// `item` and re-sorts by day according to `order`.
///
/// Replacement never re-sorts; only the append path does.
pub fn upsert_by_day<T, F>(list: &mut Vec<T>, item: T, day_of: F, order: SortOrder) -> Upserted
where
    F: Fn(&T) -> NaiveDate,
{
    let day = day_of(&item);
    if let Some(index) = list.iter().position(|existing| day_of(existing) == day) {
        list[index] = item;
        return Upserted::Replaced(index);
    }

    list.push(item);
    match order {
        SortOrder::Unsorted => {}
        SortOrder::Ascending => list.sort_by_key(|record| day_of(record)),
        SortOrder::Descending => list.sort_by_key(|record| std::cmp::Reverse(day_of(record))),
    }
    Upserted::Inserted
}
