use orrery::{AppConfig, CelestialBody, SolarSystem, Vec3, run};

fn main() {
    env_logger::init();

    let mut system = SolarSystem::new();

    let sun = system.add(
        CelestialBody::star(3.0, 100)
            .rotation_period(40.0)
            .color(Vec3::new(1.0, 0.85, 0.55))
            .texture("assets/sun.png"),
    );

    let earth = system.add(
        CelestialBody::planet(1.0, 100, sun, 10.0, 24.0)
            .rotation_period(6.0)
            .axial_tilt(23.4_f32.to_radians())
            .color(Vec3::new(0.25, 0.45, 0.85))
            .texture("assets/earth.png"),
    );

    system.add(
        CelestialBody::planet(0.3, 64, earth, 2.0, 5.0)
            .rotation_period(5.0)
            .color(Vec3::new(0.6, 0.6, 0.62))
            .texture("assets/moon.png"),
    );

    system.add(
        CelestialBody::planet(0.7, 100, sun, 16.0, 55.0)
            .rotation_period(9.0)
            .axial_tilt(0.44)
            .color(Vec3::new(0.85, 0.5, 0.3)),
    );

    let config = AppConfig::new()
        .title("Orrery - Simple Solar System")
        .size(1024, 768)
        .skybox([
            "assets/skybox/right.png",
            "assets/skybox/left.png",
            "assets/skybox/top.png",
            "assets/skybox/bottom.png",
            "assets/skybox/front.png",
            "assets/skybox/back.png",
        ]);

    run(config, system);
}
