/// WGSL shader for textured cubes lit by a camera-mounted spotlight.
pub const LIGHTING_SHADER: &str = r#"
struct FrameUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_position: vec3<f32>,
    light_cut_off: f32,
    light_direction: vec3<f32>,
    light_outer_cut_off: f32,
    light_ambient: vec3<f32>,
    light_constant: f32,
    light_diffuse: vec3<f32>,
    light_linear: f32,
    light_specular: vec3<f32>,
    light_quadratic: f32,
    view_pos: vec3<f32>,
    time: f32,
    shininess: f32,
    cheat_mode: u32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0)
var<uniform> u: FrameUniforms;

@group(1) @binding(0)
var diffuse_map: texture_2d<f32>;
@group(1) @binding(1)
var specular_map: texture_2d<f32>;
@group(1) @binding(2)
var map_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = u.projection * u.view * world;
    out.world_pos = world.xyz;
    out.normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(diffuse_map, map_sampler, in.uv).rgb;
    let shine = textureSample(specular_map, map_sampler, in.uv).rgb;

    let norm = normalize(in.normal);
    let to_light = u.light_position - in.world_pos;
    let light_dir = normalize(to_light);

    let ambient = u.light_ambient * base;

    let diff = max(dot(norm, light_dir), 0.0);
    let diffuse = u.light_diffuse * diff * base;

    let view_dir = normalize(u.view_pos - in.world_pos);
    let reflect_dir = reflect(-light_dir, norm);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), u.shininess);
    let specular = u.light_specular * spec * shine;

    // Soft cone edge between the inner and outer cut-off.
    let theta = dot(light_dir, normalize(-u.light_direction));
    let epsilon = max(u.light_cut_off - u.light_outer_cut_off, 0.0001);
    let intensity = clamp((theta - u.light_outer_cut_off) / epsilon, 0.0, 1.0);

    let distance = length(to_light);
    let attenuation = 1.0 / (u.light_constant
        + u.light_linear * distance
        + u.light_quadratic * distance * distance);

    let flicker = 0.96 + 0.04 * sin(u.time * 13.0) * sin(u.time * 7.3);
    var color = (ambient + (diffuse + specular) * intensity * flicker) * attenuation;

    if (u.cheat_mode != 0u) {
        color = max(color, base * 0.6);
    }
    return vec4<f32>(color, 1.0);
}
"#;
