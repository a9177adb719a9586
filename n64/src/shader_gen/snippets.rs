//! WGSL snippet strings inserted into the N64 template.

pub(crate) const SHADE_FLAT: &str = "@interpolate(flat)";

pub(crate) const VS_LIGHTING: &str = r#"let ln = normalize((u.model_view * vec4<f32>(in.normal, 0.0)).xyz);
    let diffuse = max(dot(ln, normalize(u.light_dir.xyz)), 0.0);
    shade = vec4<f32>(clamp(u.ambient_color.rgb + u.light_color.rgb * diffuse, vec3<f32>(0.0), vec3<f32>(1.0)), in.color.a);"#;

pub(crate) const VS_TEXGEN: &str = r#"let gn = normalize((u.model_view * vec4<f32>(in.normal, 0.0)).xyz);
    uv = gn.xy * 0.5 + vec2<f32>(0.5);"#;

pub(crate) const VS_FOG: &str = "out.fog = clamp(out.clip_position.z / out.clip_position.w * u.fog_params.x + u.fog_params.y, 0.0, 1.0);";

pub(crate) const SAMPLE_POINT: &str = r#"fn sample_tex(t: texture_2d<f32>, uv: vec2<f32>, size: vec2<f32>) -> vec4<f32> {
    return texel_at(t, floor(uv * size), size);
}"#;

// 2x2 box filter
pub(crate) const SAMPLE_AVERAGE: &str = r#"fn sample_tex(t: texture_2d<f32>, uv: vec2<f32>, size: vec2<f32>) -> vec4<f32> {
    let base = floor(uv * size - vec2<f32>(0.5));
    let sum = texel_at(t, base, size)
        + texel_at(t, base + vec2<f32>(1.0, 0.0), size)
        + texel_at(t, base + vec2<f32>(0.0, 1.0), size)
        + texel_at(t, base + vec2<f32>(1.0, 1.0), size);
    return sum * 0.25;
}"#;

// Three-sample bilinear: the triangle of texels nearest the sample point
pub(crate) const SAMPLE_BILERP3: &str = r#"fn sample_tex(t: texture_2d<f32>, uv: vec2<f32>, size: vec2<f32>) -> vec4<f32> {
    let p = uv * size - vec2<f32>(0.5);
    let base = floor(p);
    var f = p - base;
    var origin = base;
    var delta = vec2<f32>(1.0, 1.0);
    if (f.x + f.y >= 1.0) {
        origin = base + vec2<f32>(1.0, 1.0);
        delta = vec2<f32>(-1.0, -1.0);
        f = vec2<f32>(1.0) - f;
    }
    let c0 = texel_at(t, origin, size);
    let c1 = texel_at(t, origin + vec2<f32>(delta.x, 0.0), size);
    let c2 = texel_at(t, origin + vec2<f32>(0.0, delta.y), size);
    return c0 + f.x * (c1 - c0) + f.y * (c2 - c0);
}"#;

pub(crate) const FS_CYCLE2: &str = r#"i.combined = out;
    out = vec4<f32>(combine_color(i, COLOR_CYCLE1), combine_alpha(i, ALPHA_CYCLE1));
    out = clamp(out, vec4<f32>(0.0), vec4<f32>(1.0));"#;

pub(crate) const FS_FOG: &str = "out = vec4<f32>(mix(out.rgb, u.fog_color.rgb, in.fog), out.a);";
