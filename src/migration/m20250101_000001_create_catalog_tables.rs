use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pokemon::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pokemon::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pokemon::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Pokemon::ImageUrl).text().not_null())
                    .col(
                        ColumnDef::new(Pokemon::SmashCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Pokemon::PassCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Pokemon::EvolutionStage)
                            .string_len(10)
                            .not_null()
                            .default("NONE"),
                    )
                    .col(ColumnDef::new(Pokemon::Shape).string_len(50).null())
                    .col(ColumnDef::new(Pokemon::Color).string_len(20).null())
                    .col(ColumnDef::new(Pokemon::Generation).string_len(20).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vote::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vote::Username).string_len(100).not_null())
                    .col(ColumnDef::new(Vote::PokemonId).integer().not_null())
                    .col(ColumnDef::new(Vote::Smash).boolean().not_null())
                    .col(
                        ColumnDef::new(Vote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_pokemon")
                            .from(Vote::Table, Vote::PokemonId)
                            .to(Pokemon::Table, Pokemon::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One vote per (username, creature); concurrent first votes race on this.
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_username_pokemon")
                    .table(Vote::Table)
                    .col(Vote::Username)
                    .col(Vote::PokemonId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vote_pokemon_smash")
                    .table(Vote::Table)
                    .col(Vote::PokemonId)
                    .col(Vote::Smash)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pokemon::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Pokemon {
    Table,
    Id,
    Name,
    ImageUrl,
    SmashCount,
    PassCount,
    EvolutionStage,
    Shape,
    Color,
    Generation,
}

#[derive(DeriveIden)]
enum Vote {
    Table,
    Id,
    Username,
    PokemonId,
    Smash,
    CreatedAt,
}
