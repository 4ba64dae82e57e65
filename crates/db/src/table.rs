use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Item {
    Table,
    Name,
    Carb,
    Protein,
    Fruit,
    Veggie,
    LastUsed,
}

#[derive(Iden, Clone)]
pub enum ScheduleSlot {
    Table,
    Position,
    Name,
    Time,
    Carb,
    Protein,
    Fruit,
    Veggie,
}

#[derive(Iden, Clone)]
pub enum GroceryNeeded {
    Table,
    Name,
}

#[derive(Iden, Clone)]
pub enum CurrentMeal {
    Table,
    Position,
    Date,
    SlotName,
    Time,
    Item1,
    Item2,
    Item3,
    Item4,
    Status,
}

#[derive(Iden, Clone)]
pub enum MealHistory {
    Table,
    Id,
    Date,
    SlotName,
    Time,
    Item1,
    Item2,
    Item3,
    Item4,
    Status,
    ArchivedAt,
}
