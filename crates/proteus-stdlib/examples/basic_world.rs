//! Walk through the starter world: arithmetic, inheritance, points,
//! conditionals and recursion
//!
//! Run with `--json` to dump the point prototype as JSON instead of text.
//! Set `RUST_LOG=debug` to watch every send.

use proteus_core::{msg, Entity, NativeOperation, World, WorldConfig};
use proteus_stdlib::{Bootstrap, Transcript};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let json = std::env::args().any(|arg| arg == "--json");

    let mut world = World::with_config(WorldConfig::default());
    let boot = Bootstrap::install(&mut world, Transcript::new(true))?;

    println!("=== Proteus Basic World ===\n");
    println!("Bootstrapped {} entities", world.len());

    // Arithmetic through the shared number traits
    println!("\nArithmetic:");
    let ten = boot.number(&mut world, 10);
    let five = boot.number(&mut world, 5);
    let sum = world.send_with_argument(ten, "+", five)?;
    print!("  10 + 5 = ");
    world.send(sum, "print")?;
    let half = boot.float(&mut world, 0.5);
    let mixed = world.send_with_argument(sum, "*", half)?;
    print!("  15 * 0.5 = ");
    world.send(mixed, "print")?;

    // Inheritance: dog has no `speak` of its own
    println!("\nInheritance:");
    let speak = boot.method(&mut world, vec![msg!(sound)]);
    let animal = world.create(Entity::new().with_parent("parent", boot.lobby));
    world.assign_slot(animal, "speak", speak)?;
    let woof = boot.string(&mut world, "woof");
    let dog = world.create(Entity::new().with_slot("sound", woof));
    world.assign_parent_slot(dog, "parent", animal)?;
    let said = world.send(dog, "speak")?;
    print!("  dog speak = ");
    world.send(said, "print")?;
    match world.send(animal, "speak") {
        Ok(_) => println!("  animal speak unexpectedly answered"),
        Err(err) => println!("  animal speak fails: {err}"),
    }

    // Points: setters mutate, clone copies, `+` composes number sends
    println!("\nPoints:");
    let p = boot.point(&mut world, 1, 2);
    let q = world.send(p, "clone")?;
    let thirty = boot.number(&mut world, 30);
    world.send_with_argument(q, "x:", thirty)?;
    let r = world.send_with_argument(p, "+", q)?;
    for (label, point) in [("p", p), ("q", q), ("p + q", r)] {
        let x = world.send(point, "x")?;
        let y = world.send(point, "y")?;
        println!(
            "  {label} = ({}, {})",
            world.describe(x)?,
            world.describe(y)?
        );
    }

    // Conditionals evaluate blocks
    println!("\nConditionals:");
    let yes = boot.string(&mut world, "3 is less than 5");
    let block = boot.block(&mut world, vec![msg!(answer)]);
    world.assign_slot(block, "answer", yes)?;
    let three = boot.number(&mut world, 3);
    let test = world.send_with_argument(three, "<", five)?;
    let answer = world.send_with_argument(test, "ifTrue:", block)?;
    print!("  ");
    world.send(answer, "print")?;

    // Recursion: countdown: sends itself with parameter - 1
    println!("\nRecursion:");
    let zero = boot.number(&mut world, 0);
    let one = boot.number(&mut world, 1);
    let truth = boot.truth;
    let countdown = NativeOperation::new("countdown:", move |world, activation| {
        let receiver = world.receiver(activation)?;
        let n = world.argument(activation)?;
        print!("  ");
        world.send(n, "print")?;
        if world.send_with_argument(n, "=", zero)? == truth {
            return Ok(receiver);
        }
        let next = world.send_with_argument(n, "-", one)?;
        world.send_with_argument(receiver, "countdown:", next)
    });
    let method = world.create(Entity::native(countdown));
    world.assign_slot(boot.lobby, "countdown:", method)?;
    world.send_with_argument(boot.lobby, "countdown:", five)?;

    // Inspection of a prototype
    println!("\nPoint prototype:");
    let tree = world.inspect(p)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{tree}");
    }

    println!("\nTranscript: {} lines", boot.transcript().lines().len());
    println!("World now holds {} entities", world.len());

    Ok(())
}
