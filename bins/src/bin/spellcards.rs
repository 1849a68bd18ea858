// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! *Part of the wider spell cards project*
//!
//! The spell cards command line tool
//!

use clap::{Args, Parser, Subcommand, ValueEnum, builder::PossibleValue};
use log::{debug, info};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use spellcards_core::{
    CardElement, Components, DamageDice, DesignConfig, Name, School, Spell, SpellLevel,
};
use spellcards_renderer::{Backside, PdfExportOptions, SpellCardRendererPdf};
use spellcards_repository::{
    BacksideChoice, Config, SpellFilter, SpellRepository, load_collection_if_exists,
    load_design_or_default, load_spells, save_collection, save_design, save_design_as,
    set_design_option, unset_design_option,
};
use std::error::Error;
use std::path::PathBuf;

/// Spell cards entry point
///
/// One of:
/// - List and search spells
/// - List the filter options
/// - Write or import custom spells
/// - Manage the collection
/// - Export the collection to PDF
/// - Manage the card design
fn main() {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("spellcards")
        .build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(error) = CombinedLogger::init(vec![TermLogger::new(
        level,
        config_log,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]) {
        eprintln!("Error setting up logging: {error}");
    }

    if let Err(error) = run(args) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::ensure_setup()?,
    };
    debug!("Using config {config:?}");

    match args.command {
        Command::Spells(spells_args) => list_spells(&config, spells_args),
        Command::Options => list_options(&config),
        Command::NewSpell(new_spell_args) => new_spell(&config, new_spell_args),
        Command::ImportSpells(import_args) => import_spells(&config, import_args),
        Command::Collection(collection_args) => manage_collection(&config, collection_args),
        Command::Export(export_args) => export(&config, export_args),
        Command::Design(design_args) => manage_design(&config, design_args),
    }
}

fn load_repository(config: &Config) -> Result<SpellRepository, Box<dyn Error>> {
    Ok(SpellRepository::load(
        &config.core_spells_path,
        &config.custom_spells_path,
    )?)
}

fn list_spells(config: &Config, args: SpellsArgs) -> Result<(), Box<dyn Error>> {
    let repository = load_repository(config)?;
    let schools = args
        .school
        .iter()
        .map(|school| school.parse::<School>())
        .collect::<Result<Vec<_>, _>>()?;
    let levels = args
        .level
        .iter()
        .map(|level| SpellLevel::parse(level))
        .collect::<Result<Vec<_>, _>>()?;
    let filter = SpellFilter::all()
        .with_classes(args.class)
        .with_schools(schools)
        .with_levels(levels);

    if let Some(query) = args.search {
        match repository.find_by_prefix(&query, &filter) {
            Some(spell) => print!("{}", spell.details()),
            None => println!("No spell starts with \"{query}\""),
        }
        return Ok(());
    }

    let spells = repository.filter(&filter);
    for spell in &spells {
        println!(
            "{} ({}): {} {}",
            spell.name(),
            spell.source(),
            spell.level(),
            spell.school()
        );
    }
    println!("{} spells", spells.len());
    Ok(())
}

fn list_options(config: &Config) -> Result<(), Box<dyn Error>> {
    let repository = load_repository(config)?;
    println!("Classes: {}", repository.class_options().join(", "));
    println!("Schools: {}", repository.school_options().join(", "));
    Ok(())
}

/// Write a custom spell, either from scratch or starting from a copy of an
/// existing spell
fn new_spell(config: &Config, args: NewSpellArgs) -> Result<(), Box<dyn Error>> {
    let mut repository = load_repository(config)?;
    let name = Name::from(&args.name)?;
    let level = args.level.as_deref().map(SpellLevel::parse).transpose()?;
    let school = args
        .school
        .as_deref()
        .map(|school| school.parse::<School>())
        .transpose()?;

    let mut spell = match &args.from {
        Some(template) => repository.spell_from_template(template, name)?,
        None => Spell::new(
            name,
            level.ok_or("--level is required without --from")?,
            school.ok_or("--school is required without --from")?,
        ),
    };
    if let Some(level) = level {
        spell = spell.with_level(level);
    }
    if let Some(school) = school {
        spell = spell.with_school(school);
    }
    if !args.class.is_empty() {
        spell = spell.with_classes(args.class);
    }
    if let Some(casting_time) = args.casting_time {
        spell = spell.with_casting_time(casting_time);
    }
    if let Some(range) = args.range {
        spell = spell.with_range(range);
    }
    if let Some(duration) = args.duration {
        spell = spell.with_duration(duration);
    }
    if let Some(description) = args.description {
        spell = spell.with_description(description);
    }
    if let Some(components) = args.components {
        spell = spell.with_components(Components::Raw(components));
    }
    if let Some(area_of_effect) = args.area_of_effect {
        spell = spell.with_area_of_effect(area_of_effect);
    }
    if let Some(attack_save) = args.attack_save {
        spell = spell.with_attack_save(attack_save);
    }
    if !args.damage.is_empty() {
        let damage_dice = args
            .damage
            .iter()
            .map(|damage| {
                DamageDice::parse(damage).ok_or_else(|| {
                    format!("Invalid damage {damage:?} (expected e.g. \"8d6 fire\")")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        spell = spell.with_damage_dice(damage_dice);
    }
    if args.ritual {
        spell = spell.with_ritual(true);
    }

    let key = spell.key();
    repository.save_custom_spell(spell, &config.custom_spells_path)?;
    println!("Saved {key} to {}", config.custom_spells_path.display());
    Ok(())
}

/// Add the spells in a JSON file to the custom spells
fn import_spells(config: &Config, args: ImportSpellsArgs) -> Result<(), Box<dyn Error>> {
    let mut repository = load_repository(config)?;
    let spells = load_spells(&args.file)?;
    let count = spells.len();
    repository.save_custom_spells(spells, &config.custom_spells_path)?;
    println!(
        "Imported {count} spells into {}",
        config.custom_spells_path.display()
    );
    Ok(())
}

fn collection_path(config: &Config, collection: Option<PathBuf>) -> PathBuf {
    collection.unwrap_or_else(|| config.collection_path(spellcards_core::DEFAULT_COLLECTION_NAME))
}

fn manage_collection(config: &Config, args: CollectionArgs) -> Result<(), Box<dyn Error>> {
    let path = collection_path(config, args.collection);
    let mut collection = load_collection_if_exists(&path)?;

    let name = match (&args.action, &args.name) {
        (CollectionAction::Show, _) => {
            println!("{} ({} spells)", collection.name(), collection.len());
            for spell in collection.iter() {
                println!("  {}", spell.key());
            }
            return Ok(());
        }
        (_, Some(name)) => name,
        (_, None) => return Err("--name is required".into()),
    };

    let repository = load_repository(config)?;
    let spell = repository
        .find_by_name(name, args.source.as_deref())?
        .clone();
    let key = spell.key();
    match args.action {
        CollectionAction::Add => {
            if collection.add(spell) {
                println!("Added {key}");
            } else {
                println!("{key} is already in the collection");
            }
        }
        CollectionAction::Remove => match collection.remove(&key) {
            Some(_) => println!("Removed {key}"),
            None => println!("{key} isn't in the collection"),
        },
        CollectionAction::Toggle => {
            if collection.toggle(&spell) {
                println!("Added {key}");
            } else {
                println!("Removed {key}");
            }
        }
        CollectionAction::Show => {}
    }
    save_collection(&path, &collection)?;
    info!("Collection saved to {path:?}");
    Ok(())
}

fn backside(
    config: &Config,
    choice: Option<BacksideChoice>,
    image: Option<PathBuf>,
) -> Result<Backside, Box<dyn Error>> {
    let image = image.or_else(|| config.backside_image.clone());
    match choice.unwrap_or(config.backside) {
        BacksideChoice::None => Ok(Backside::None),
        BacksideChoice::Preset => Ok(Backside::Preset),
        BacksideChoice::Custom => match image {
            Some(path) => Ok(Backside::Custom(path)),
            None => Err("a custom backside needs --backside-image".into()),
        },
    }
}

fn export(config: &Config, args: ExportArgs) -> Result<(), Box<dyn Error>> {
    let collection = load_collection_if_exists(&collection_path(config, args.collection))?;
    let design = load_design_or_default(args.design.as_deref().unwrap_or(config.design_path.as_path()));
    let options = PdfExportOptions {
        title: format!("Spell cards: {}", collection.name()),
        assets_dir: config.assets_dir.clone(),
        backside: backside(config, args.backside.map(BacksideChoice::from), args.backside_image)?,
        cut_marks: args.cut_marks || config.cut_marks,
    };
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
    let renderer = SpellCardRendererPdf::new(options);
    let path = renderer.export_collection(&design, &collection, &output_dir)?;
    println!("Exported {} cards to {}", collection.len(), path.display());
    Ok(())
}

fn manage_design(config: &Config, args: DesignArgs) -> Result<(), Box<dyn Error>> {
    let design_path = args.design.unwrap_or_else(|| config.design_path.clone());
    match args.action {
        DesignAction::Init => {
            if design_path.exists() && !args.force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    design_path.display()
                )
                .into());
            }
            save_design(&design_path, &DesignConfig::default())?;
            println!("Default design written to {}", design_path.display());
        }
        DesignAction::Show => {
            let design = load_design_or_default(&design_path);
            match args.element {
                Some(name) => match design.element_by_name(&name) {
                    Some(element) => println!("{}", serde_json::to_string_pretty(element)?),
                    None => return Err(format!("No element named \"{name}\"").into()),
                },
                None => println!("{}", serde_json::to_string_pretty(&design)?),
            }
        }
        DesignAction::Elements => {
            for element in CardElement::ALL {
                println!("{}", element.key());
            }
        }
        DesignAction::Set => {
            let element = args.element.ok_or("--element is required")?;
            let option = args.option.ok_or("--option is required")?;
            let value = args.value.ok_or("--value is required")?;
            let design = set_design_option(&design_path, &element, &option, &value)?;
            if let Some(element_config) = design.element_by_name(&element) {
                println!("{element}: {}", serde_json::to_string(element_config)?);
            }
        }
        DesignAction::Unset => {
            let element = args.element.ok_or("--element is required")?;
            unset_design_option(&design_path, &element, args.option.as_deref())?;
            match args.option {
                Some(option) => println!("{element}.{option} reset to its default"),
                None => println!("{element} removed from the design"),
            }
        }
        DesignAction::SaveAs => {
            let name = args.name.ok_or("--name is required")?;
            let design = load_design_or_default(&design_path);
            let path = save_design_as(&config.designs_dir, &name, &design)?;
            println!("Design saved to {}", path.display());
        }
    }
    Ok(())
}

/// Spell cards CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Spell cards: manage spells and export printable cards",
    after_help = "Paths default to those in the config file, created on first use"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List spells (filtered), or show the first match for a search
    Spells(SpellsArgs),

    /// List the class & school filter values
    Options,

    /// Write a custom spell (from scratch, or copying --from another spell)
    NewSpell(NewSpellArgs),

    /// Add the spells in a JSON file to the custom spells
    ImportSpells(ImportSpellsArgs),

    /// Show or change the collection
    Collection(CollectionArgs),

    /// Export the collection to PDF
    Export(ExportArgs),

    /// Show or save the card design
    Design(DesignArgs),
}

#[derive(Args, Debug)]
pub struct SpellsArgs {
    /// Only spells for this class (may be repeated)
    #[arg(long)]
    pub class: Vec<String>,

    /// Only spells of this school (may be repeated)
    #[arg(long)]
    pub school: Vec<String>,

    /// Only spells of this level, 0 or "cantrip" for cantrips (may be repeated)
    #[arg(long)]
    pub level: Vec<String>,

    /// Show the first spell whose name starts with this
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct NewSpellArgs {
    /// The new spell's name (an existing custom spell of that name is replaced)
    #[arg(long)]
    pub name: String,

    /// Start from a copy of this spell
    #[arg(long)]
    pub from: Option<String>,

    /// 0 or "cantrip" to 9 (required without --from)
    #[arg(long)]
    pub level: Option<String>,

    /// Required without --from
    #[arg(long)]
    pub school: Option<String>,

    /// A class that can cast the spell (may be repeated)
    #[arg(long)]
    pub class: Vec<String>,

    #[arg(long)]
    pub casting_time: Option<String>,

    #[arg(long)]
    pub range: Option<String>,

    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// e.g. "V, S, M (a pinch of sulfur)"
    #[arg(long)]
    pub components: Option<String>,

    #[arg(long)]
    pub area_of_effect: Option<String>,

    /// e.g. "dexterity" or "ranged"
    #[arg(long)]
    pub attack_save: Option<String>,

    /// Damage such as "8d6 fire" (may be repeated)
    #[arg(long)]
    pub damage: Vec<String>,

    #[arg(long)]
    pub ritual: bool,
}

#[derive(Args, Debug)]
pub struct ImportSpellsArgs {
    /// A JSON array of spells
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct CollectionArgs {
    #[arg(value_enum)]
    pub action: CollectionAction,

    /// The spell's name
    #[arg(long)]
    pub name: Option<String>,

    /// The spell's source (Core is preferred when not given)
    #[arg(long)]
    pub source: Option<String>,

    /// Path to the collection file
    #[arg(long)]
    pub collection: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the collection file
    #[arg(long)]
    pub collection: Option<PathBuf>,

    /// Path to the design file
    #[arg(long)]
    pub design: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub backside: Option<BacksideArg>,

    /// The image used for a custom backside
    #[arg(long)]
    pub backside_image: Option<PathBuf>,

    /// Print cut marks at the card corners
    #[arg(long)]
    pub cut_marks: bool,

    /// Where the PDF is written
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DesignArgs {
    #[arg(value_enum)]
    pub action: DesignAction,

    /// Path to the design file
    #[arg(long)]
    pub design: Option<PathBuf>,

    /// The element to show or change
    #[arg(long)]
    pub element: Option<String>,

    /// The element option to change (e.g. font_size, color, x)
    #[arg(long)]
    pub option: Option<String>,

    /// The new value of the option
    #[arg(long)]
    pub value: Option<String>,

    /// Name to save the design as
    #[arg(long)]
    pub name: Option<String>,

    /// Overwrite an existing design
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone)]
pub enum CollectionAction {
    Show,
    Add,
    Remove,
    Toggle,
}

impl ValueEnum for CollectionAction {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Show, Self::Add, Self::Remove, Self::Toggle]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            CollectionAction::Show => {
                Some(PossibleValue::new("show").help("List the spells in the collection"))
            }
            CollectionAction::Add => {
                Some(PossibleValue::new("add").help("Add the named spell to the collection"))
            }
            CollectionAction::Remove => Some(
                PossibleValue::new("remove").help("Remove the named spell from the collection"),
            ),
            CollectionAction::Toggle => Some(
                PossibleValue::new("toggle")
                    .help("Add the named spell, or remove it if it's already there"),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DesignAction {
    Init,
    Show,
    Elements,
    Set,
    Unset,
    SaveAs,
}

impl ValueEnum for DesignAction {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Init,
            Self::Show,
            Self::Elements,
            Self::Set,
            Self::Unset,
            Self::SaveAs,
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            DesignAction::Init => {
                Some(PossibleValue::new("init").help("Write the default design to the design file"))
            }
            DesignAction::Show => Some(PossibleValue::new("show").help("Print the design")),
            DesignAction::Elements => {
                Some(PossibleValue::new("elements").help("List the card elements"))
            }
            DesignAction::Set => Some(
                PossibleValue::new("set").help("Set --option of --element to --value"),
            ),
            DesignAction::Unset => Some(PossibleValue::new("unset").help(
                "Reset --option of --element to its default, or remove --element entirely",
            )),
            DesignAction::SaveAs => Some(
                PossibleValue::new("save-as").help("Save a copy of the design under a name"),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum BacksideArg {
    None,
    Preset,
    Custom,
}

impl ValueEnum for BacksideArg {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::None, Self::Preset, Self::Custom]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            BacksideArg::None => Some(PossibleValue::new("none").help("No backside pages")),
            BacksideArg::Preset => {
                Some(PossibleValue::new("preset").help("The bundled backdrop"))
            }
            BacksideArg::Custom => {
                Some(PossibleValue::new("custom").help("The image given by --backside-image"))
            }
        }
    }
}

impl From<BacksideArg> for BacksideChoice {
    fn from(arg: BacksideArg) -> Self {
        match arg {
            BacksideArg::None => BacksideChoice::None,
            BacksideArg::Preset => BacksideChoice::Preset,
            BacksideArg::Custom => BacksideChoice::Custom,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use spellcards_repository::load_design;
    use std::fs;
    use tempdir::TempDir;

    const CORE_SPELLS: &str = r#"[
        {
            "name": "Fireball",
            "level": 3,
            "school": "evocation",
            "classes": ["Sorcerer", "Wizard"],
            "damage_dice": [{ "dice": "8d6", "type": "fire" }]
        }
    ]"#;

    /// A config file with every path inside `dir` & a one spell core list
    fn setup(dir: &TempDir) -> (Config, String) {
        let config = Config::in_dir(dir.path());
        fs::write(&config.core_spells_path, CORE_SPELLS).unwrap();
        let config_path = dir.path().join("config.json");
        config.save_to_path(&config_path).unwrap();
        (config, config_path.to_string_lossy().to_string())
    }

    fn run_with(config_path: &str, args: &[&str]) -> Result<(), Box<dyn Error>> {
        let mut full_args = vec!["spellcards", "--config", config_path];
        full_args.extend_from_slice(args);
        run(Cli::parse_from(full_args))
    }

    #[test]
    fn design_set_and_unset() {
        let dir = TempDir::new("spellcards").unwrap();
        let (config, config_path) = setup(&dir);

        let set = [
            "design", "set", "--element", "spell_name", "--option", "font_size", "--value", "14",
        ];
        run_with(&config_path, &set).unwrap();
        let design = load_design(&config.design_path).unwrap();
        let spell_name = design.element(CardElement::SpellName).unwrap();
        assert_eq!(spell_name.font_size(), 14.0);

        let unset = ["design", "unset", "--element", "spell_name", "--option", "font_size"];
        run_with(&config_path, &unset).unwrap();
        let design = load_design(&config.design_path).unwrap();
        let spell_name = design.element(CardElement::SpellName).unwrap();
        assert!(spell_name.get("font_size").is_none());

        run_with(&config_path, &["design", "unset", "--element", "spell_name"]).unwrap();
        let design = load_design(&config.design_path).unwrap();
        assert!(design.element(CardElement::SpellName).is_none());

        let missing_value = ["design", "set", "--element", "spell_name", "--option", "x"];
        assert!(run_with(&config_path, &missing_value).is_err());
        let unknown = [
            "design", "set", "--element", "banner", "--option", "x", "--value", "1",
        ];
        assert!(run_with(&config_path, &unknown).is_err());
    }

    #[test]
    fn new_spell_is_saved_as_custom() {
        let dir = TempDir::new("spellcards").unwrap();
        let (config, config_path) = setup(&dir);

        let from_template = [
            "new-spell", "--from", "Fireball", "--name", "Frostball", "--damage", "8d6 cold",
        ];
        run_with(&config_path, &from_template).unwrap();
        let scratch = [
            "new-spell", "--name", "Glimmer", "--level", "cantrip", "--school", "illusion",
            "--class", "Bard", "--ritual",
        ];
        run_with(&config_path, &scratch).unwrap();

        let custom = load_spells(&config.custom_spells_path).unwrap();
        assert_eq!(custom.len(), 2);
        let frostball = custom.iter().find(|spell| spell.name().as_str() == "Frostball").unwrap();
        assert_eq!(frostball.level(), SpellLevel::parse("3").unwrap());
        assert_eq!(frostball.damage_dice()[0].damage_type, "cold");
        let glimmer = custom.iter().find(|spell| spell.name().as_str() == "Glimmer").unwrap();
        assert_eq!(glimmer.level(), SpellLevel::parse("0").unwrap());
        assert_eq!(glimmer.classes(), &["Bard"]);

        // Without a template the level & school are needed
        assert!(run_with(&config_path, &["new-spell", "--name", "Nothing"]).is_err());
        let bad_damage = [
            "new-spell", "--from", "Fireball", "--name", "Dud", "--damage", "8d6",
        ];
        assert!(run_with(&config_path, &bad_damage).is_err());
    }

    #[test]
    fn import_spells_adds_to_custom() {
        let dir = TempDir::new("spellcards").unwrap();
        let (config, config_path) = setup(&dir);
        let import_path = dir.path().join("import.json");
        fs::write(
            &import_path,
            r#"[
                { "name": "Shadow Bolt", "level": 2, "school": "necromancy" },
                { "name": "Broken", "level": 42, "school": "necromancy" }
            ]"#,
        )
        .unwrap();

        run_with(&config_path, &["import-spells", import_path.to_str().unwrap()]).unwrap();
        let custom = load_spells(&config.custom_spells_path).unwrap();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].name().as_str(), "Shadow Bolt");
    }
}
